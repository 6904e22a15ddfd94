//! Deterministic in-memory doubles for the two external collaborators.
//!
//! [`InMemoryBank`] stands in for the asset settlement system (balances,
//! allowances granted to the wrapper, and wrapper custody) and
//! [`InMemoryPools`] for the external lending protocol. The pool double keeps
//! its own books per (pool, asset, user) and settles against the bank's
//! custody, so a full composite operation moves funds exactly the way the
//! real collaborators would. It refuses over-borrowing against its liquidity
//! and over-withdrawal of supplied collateral, but does not model interest or
//! collateral factors.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    address::Address,
    error::{PoolRejected, TransferError},
    pool::LendingPool,
    transfer::TransferGate,
};

#[derive(Debug, Default)]
struct BankState {
    /// (asset, holder) -> spendable balance.
    balances: HashMap<(Address, Address), u128>,
    /// (asset, owner) -> remaining allowance granted to the wrapper.
    allowances: HashMap<(Address, Address), u128>,
    /// asset -> amount held in wrapper custody.
    custody: HashMap<Address, u128>,
}

#[derive(Debug, Default)]
pub struct InMemoryBank {
    state: Mutex<BankState>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BankState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mint(&self, asset: &Address, holder: &Address, amount: u128) {
        *self
            .state()
            .balances
            .entry((*asset, *holder))
            .or_default() += amount;
    }

    /// Grants the wrapper an allowance over `owner`'s balance, replacing any
    /// previous grant.
    pub fn approve(&self, asset: &Address, owner: &Address, amount: u128) {
        self.state().allowances.insert((*asset, *owner), amount);
    }

    pub fn balance_of(&self, asset: &Address, holder: &Address) -> u128 {
        self.state()
            .balances
            .get(&(*asset, *holder))
            .copied()
            .unwrap_or(0)
    }

    pub fn allowance(&self, asset: &Address, owner: &Address) -> u128 {
        self.state()
            .allowances
            .get(&(*asset, *owner))
            .copied()
            .unwrap_or(0)
    }

    pub fn custody_of(&self, asset: &Address) -> u128 {
        self.state().custody.get(asset).copied().unwrap_or(0)
    }

    /// Settlement hook for the pool double: moves custody into the pool.
    fn debit_custody(&self, asset: &Address, amount: u128) -> Result<(), PoolRejected> {
        let mut state = self.state();
        let custody = state.custody.entry(*asset).or_default();
        if *custody < amount {
            return Err(PoolRejected::new("amount exceeds wrapper custody"));
        }
        *custody -= amount;
        Ok(())
    }

    /// Settlement hook for the pool double: releases pool funds into custody.
    fn credit_custody(&self, asset: &Address, amount: u128) {
        *self.state().custody.entry(*asset).or_default() += amount;
    }
}

impl TransferGate for InMemoryBank {
    fn pull_from(
        &self,
        asset: &Address,
        owner: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        let mut state = self.state();
        let allowance = state
            .allowances
            .get(&(*asset, *owner))
            .copied()
            .unwrap_or(0);
        if allowance < amount {
            return Err(TransferError::InsufficientAllowance);
        }
        let balance = state.balances.get(&(*asset, *owner)).copied().unwrap_or(0);
        if balance < amount {
            return Err(TransferError::InsufficientBalance);
        }
        state.allowances.insert((*asset, *owner), allowance - amount);
        state.balances.insert((*asset, *owner), balance - amount);
        *state.custody.entry(*asset).or_default() += amount;
        Ok(())
    }

    fn push_to(
        &self,
        asset: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        let mut state = self.state();
        let custody = state.custody.entry(*asset).or_default();
        if *custody < amount {
            return Err(TransferError::InsufficientCustody);
        }
        *custody -= amount;
        *state.balances.entry((*asset, *recipient)).or_default() += amount;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PoolBook {
    /// asset -> lendable liquidity.
    liquidity: HashMap<Address, u128>,
    /// (asset, user) -> collateral supplied through the wrapper.
    supplied: HashMap<(Address, Address), u128>,
    /// (asset, user) -> outstanding debt as tracked by the pool.
    borrowed: HashMap<(Address, Address), u128>,
    paused: bool,
}

#[derive(Debug)]
pub struct InMemoryPools {
    bank: Arc<InMemoryBank>,
    pools: Mutex<HashMap<Address, PoolBook>>,
}

impl InMemoryPools {
    pub fn new(bank: Arc<InMemoryBank>) -> Self {
        Self {
            bank,
            pools: Mutex::new(HashMap::new()),
        }
    }

    fn pools(&self) -> MutexGuard<'_, HashMap<Address, PoolBook>> {
        self.pools.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_pool(&self, pool: Address) {
        self.pools().entry(pool).or_default();
    }

    pub fn add_liquidity(&self, pool: &Address, asset: &Address, amount: u128) {
        let mut pools = self.pools();
        let book = pools.entry(*pool).or_default();
        *book.liquidity.entry(*asset).or_default() += amount;
    }

    /// Pauses or resumes every market of a pool: all operations are rejected
    /// while paused.
    pub fn set_paused(&self, pool: &Address, paused: bool) {
        if let Some(book) = self.pools().get_mut(pool) {
            book.paused = paused;
        }
    }

    pub fn supplied(&self, pool: &Address, asset: &Address, user: &Address) -> u128 {
        self.pools()
            .get(pool)
            .and_then(|book| book.supplied.get(&(*asset, *user)).copied())
            .unwrap_or(0)
    }

    pub fn borrowed(&self, pool: &Address, asset: &Address, user: &Address) -> u128 {
        self.pools()
            .get(pool)
            .and_then(|book| book.borrowed.get(&(*asset, *user)).copied())
            .unwrap_or(0)
    }

    fn check_open(
        pools: &HashMap<Address, PoolBook>,
        pool: &Address,
    ) -> Result<(), PoolRejected> {
        match pools.get(pool) {
            None => Err(PoolRejected::new("unknown pool")),
            Some(book) if book.paused => Err(PoolRejected::new("market paused")),
            Some(_) => Ok(()),
        }
    }
}

impl LendingPool for InMemoryPools {
    fn supply(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected> {
        let mut pools = self.pools();
        Self::check_open(&pools, pool)?;
        self.bank.debit_custody(asset, amount)?;
        let book = pools.get_mut(pool).expect("checked above");
        *book.supplied.entry((*asset, *on_behalf_of)).or_default() += amount;
        Ok(())
    }

    fn borrow(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected> {
        let mut pools = self.pools();
        Self::check_open(&pools, pool)?;
        let book = pools.get_mut(pool).expect("checked above");
        let liquidity = book.liquidity.entry(*asset).or_default();
        if *liquidity < amount {
            return Err(PoolRejected::new("insufficient pool liquidity"));
        }
        *liquidity -= amount;
        *book.borrowed.entry((*asset, *on_behalf_of)).or_default() += amount;
        self.bank.credit_custody(asset, amount);
        Ok(())
    }

    fn repay(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected> {
        let mut pools = self.pools();
        Self::check_open(&pools, pool)?;
        {
            let book = pools.get_mut(pool).expect("checked above");
            let borrowed = book.borrowed.entry((*asset, *on_behalf_of)).or_default();
            if *borrowed < amount {
                return Err(PoolRejected::new("repay exceeds outstanding debt"));
            }
        }
        self.bank.debit_custody(asset, amount)?;
        let book = pools.get_mut(pool).expect("checked above");
        *book
            .borrowed
            .get_mut(&(*asset, *on_behalf_of))
            .expect("entry created above") -= amount;
        *book.liquidity.entry(*asset).or_default() += amount;
        Ok(())
    }

    fn withdraw(
        &self,
        pool: &Address,
        asset: &Address,
        amount: u128,
        on_behalf_of: &Address,
    ) -> Result<(), PoolRejected> {
        let mut pools = self.pools();
        Self::check_open(&pools, pool)?;
        let book = pools.get_mut(pool).expect("checked above");
        let supplied = book.supplied.entry((*asset, *on_behalf_of)).or_default();
        if *supplied < amount {
            return Err(PoolRejected::new("withdraw exceeds supplied collateral"));
        }
        *supplied -= amount;
        self.bank.credit_custody(asset, amount);
        Ok(())
    }
}
