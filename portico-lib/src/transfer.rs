use auto_impl::auto_impl;

use crate::{address::Address, error::TransferError};

/// Allowance-gated movement of assets between a counterparty and wrapper
/// custody.
///
/// Implementations talk to an external settlement system: a success is an
/// acknowledged external mutation and must not be rolled back locally.
#[auto_impl(&, Arc)]
pub trait TransferGate {
    /// Pulls `amount` of `asset` from `owner` into wrapper custody.
    ///
    /// Requires a pre-granted allowance to the wrapper covering `amount` and
    /// a spendable balance covering `amount`.
    fn pull_from(
        &self,
        asset: &Address,
        owner: &Address,
        amount: u128,
    ) -> Result<(), TransferError>;

    /// Pays `amount` of `asset` out of wrapper custody to `recipient`.
    fn push_to(
        &self,
        asset: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), TransferError>;
}
