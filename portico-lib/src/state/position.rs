use borsh::{BorshDeserialize, BorshSerialize};

use crate::{error::LedgerResult, math::safe_math::SafeMath};

/// Per-(asset, user) balances as recorded by the wrapper.
///
/// The ledger mirrors what the external pool holds on behalf of the wrapper
/// for this key. Zero balances are a valid terminal state, a position is
/// never destroyed once created.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
#[cfg_attr(
    feature = "client",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Position {
    deposit_atoms: u128,
    borrow_atoms: u128,
}

impl Position {
    #[inline(always)]
    pub fn deposit_atoms(&self) -> u128 {
        self.deposit_atoms
    }

    #[inline(always)]
    pub fn borrow_atoms(&self) -> u128 {
        self.borrow_atoms
    }

    pub fn record_deposit(&mut self, atoms: u128) -> LedgerResult {
        self.deposit_atoms = self.deposit_atoms.safe_add(atoms)?;
        Ok(())
    }

    pub fn record_borrow(&mut self, atoms: u128) -> LedgerResult {
        self.borrow_atoms = self.borrow_atoms.safe_add(atoms)?;
        Ok(())
    }

    pub fn record_repay(&mut self, atoms: u128) -> LedgerResult {
        self.borrow_atoms = self.borrow_atoms.safe_sub(atoms)?;
        Ok(())
    }

    pub fn record_withdraw(&mut self, atoms: u128) -> LedgerResult {
        self.deposit_atoms = self.deposit_atoms.safe_sub(atoms)?;
        Ok(())
    }
}
