use std::sync::{PoisonError, RwLock};

use auto_impl::auto_impl;

use crate::{address::Address, error::PoolRejected};

/// Transport to external lending pools, addressed per call.
///
/// Solvency, collateral-factor and health checks live entirely on the pool
/// side and are never duplicated by the wrapper. Each call is atomic as
/// observed by the wrapper: it either fully succeeds or leaves the pool
/// unchanged.
#[auto_impl(&, Arc)]
pub trait LendingPool {
    /// Forwards `amount` of `asset` already in wrapper custody into the pool
    /// as collateral credited to `on_behalf_of`.
    fn supply(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected>;

    /// Requests the pool release `amount` of `asset` into wrapper custody
    /// against the collateral already supplied for `on_behalf_of`.
    fn borrow(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected>;

    /// Forwards `amount` from wrapper custody to reduce `on_behalf_of`'s
    /// outstanding debt.
    fn repay(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected>;

    /// Requests the pool release `amount` of previously supplied collateral
    /// for `on_behalf_of` back into wrapper custody.
    fn withdraw(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected>;
}

/// Currently configured pool target.
///
/// Unset at construction. Each administrative set overwrites the previous
/// value, re-setting is allowed so a deployment can migrate pools.
#[derive(Debug, Default)]
pub struct PoolConfig {
    target: RwLock<Option<Address>>,
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the target, returning the previous one if any.
    pub fn set(&self, pool: Address) -> Option<Address> {
        self.target
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(pool)
    }

    pub fn get(&self) -> Option<Address> {
        *self.target.read().unwrap_or_else(PoisonError::into_inner)
    }
}
