use dashmap::DashMap;

use crate::{address::Address, error::LedgerResult};

use super::position::Position;

/// Key identifying a position: (asset, user).
pub type PositionKey = (Address, Address);

/// What the wrapper believes each user owns and owes, per asset.
///
/// This is a cache of pool truth: every mutation here follows a successful
/// call against the external pool, divergence is a correctness bug. Entries
/// are created implicitly on first write and never removed. Distinct keys can
/// be read and written concurrently.
#[derive(Debug, Default)]
pub struct PositionLedger {
    positions: DashMap<PositionKey, Position>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded deposit balance, zero for unknown keys. Never fails.
    pub fn deposit_amount(&self, asset: &Address, user: &Address) -> u128 {
        self.positions
            .get(&(*asset, *user))
            .map(|position| position.deposit_atoms())
            .unwrap_or(0)
    }

    /// Recorded borrow balance, zero for unknown keys. Never fails.
    pub fn borrow_amount(&self, asset: &Address, user: &Address) -> u128 {
        self.positions
            .get(&(*asset, *user))
            .map(|position| position.borrow_atoms())
            .unwrap_or(0)
    }

    /// Snapshot of the position for a key, default for unknown keys.
    pub fn position(&self, asset: &Address, user: &Address) -> Position {
        self.positions
            .get(&(*asset, *user))
            .map(|position| *position)
            .unwrap_or_default()
    }

    pub fn record_deposit(
        &self,
        asset: &Address,
        user: &Address,
        atoms: u128,
    ) -> LedgerResult<Position> {
        let mut entry = self.positions.entry((*asset, *user)).or_default();
        entry.record_deposit(atoms)?;
        Ok(*entry)
    }

    pub fn record_borrow(
        &self,
        asset: &Address,
        user: &Address,
        atoms: u128,
    ) -> LedgerResult<Position> {
        let mut entry = self.positions.entry((*asset, *user)).or_default();
        entry.record_borrow(atoms)?;
        Ok(*entry)
    }

    pub fn record_repay(
        &self,
        asset: &Address,
        user: &Address,
        atoms: u128,
    ) -> LedgerResult<Position> {
        let mut entry = self.positions.entry((*asset, *user)).or_default();
        entry.record_repay(atoms)?;
        Ok(*entry)
    }

    pub fn record_withdraw(
        &self,
        asset: &Address,
        user: &Address,
        atoms: u128,
    ) -> LedgerResult<Position> {
        let mut entry = self.positions.entry((*asset, *user)).or_default();
        entry.record_withdraw(atoms)?;
        Ok(*entry)
    }
}
