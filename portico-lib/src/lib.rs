//! Collateralized lending position wrapper.
//!
//! Composes an allowance-gated [`transfer::TransferGate`] and an external
//! [`pool::LendingPool`] into two composite operations, deposit-then-borrow
//! and repay-then-withdraw, while a [`state::ledger::PositionLedger`] records
//! what each user owns and owes per asset. The external pool stays the
//! authority for solvency: the ledger is a cache of pool truth.

pub mod address;
pub mod error;
pub mod event;
pub mod math;
pub mod pool;
pub mod state;
pub mod transfer;
pub mod wrapper;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
