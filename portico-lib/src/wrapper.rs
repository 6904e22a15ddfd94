use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::{
    address::Address,
    error::{LedgerError, ResultExt, WrapperError, WrapperResult},
    event::{CompositeTransactionEvent, SetPoolEvent, WrapperEvent},
    pool::{LendingPool, PoolConfig},
    state::ledger::{PositionKey, PositionLedger},
    transfer::TransferGate,
};

/// Composes the transfer gate and the lending pool into the two composite
/// operations, keeping the position ledger in sync with pool truth.
///
/// Each composite operation is a single linear pipeline: a step failure
/// aborts the remaining steps and surfaces the failed step, already committed
/// steps are not compensated. Custody stranded by a mid-sequence failure is
/// recovered out of band, never by the wrapper itself.
///
/// Operations hold per-(asset, user) locks for their whole sequence, so calls
/// touching the same key are serialized while unrelated keys interleave
/// freely.
pub struct PoolWrapper<G, P> {
    gate: G,
    pool: P,
    config: PoolConfig,
    ledger: PositionLedger,
    locks: PositionLocks,
}

#[derive(Debug, Default)]
struct PositionLocks {
    locks: DashMap<PositionKey, Arc<Mutex<()>>>,
}

impl PositionLocks {
    fn key_lock(&self, key: PositionKey) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(key).or_default().value())
    }

    /// Runs `f` while holding the locks for both keys, acquired in canonical
    /// order so two operations over the same pair cannot deadlock.
    fn with_locked_pair<R>(&self, a: PositionKey, b: PositionKey, f: impl FnOnce() -> R) -> R {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let first_lock = self.key_lock(first);
        let _first = first_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if first == second {
            return f();
        }
        let second_lock = self.key_lock(second);
        let _second = second_lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

impl<G: TransferGate, P: LendingPool> PoolWrapper<G, P> {
    pub fn new(gate: G, pool: P) -> Self {
        Self {
            gate,
            pool,
            config: PoolConfig::new(),
            ledger: PositionLedger::new(),
            locks: PositionLocks::default(),
        }
    }

    /// Administrative: points the wrapper at a lending pool, overwriting any
    /// previously configured target.
    pub fn set_lending_pool(&self, pool: Address) -> SetPoolEvent {
        let previous = self.config.set(pool);
        let event = SetPoolEvent { previous, pool };
        tracing::info!(?event, "lending pool configured");
        event
    }

    pub fn lending_pool(&self) -> Option<Address> {
        self.config.get()
    }

    /// Recorded deposit balance for (asset, user). Pure, total, never fails.
    #[inline(always)]
    pub fn get_user_deposit_amount(&self, asset: &Address, user: &Address) -> u128 {
        self.ledger.deposit_amount(asset, user)
    }

    /// Recorded borrow balance for (asset, user). Pure, total, never fails.
    #[inline(always)]
    pub fn get_borrow_amount(&self, asset: &Address, user: &Address) -> u128 {
        self.ledger.borrow_amount(asset, user)
    }

    /// Pulls `collateral_amount` of `collateral_asset` from `caller`,
    /// supplies it to the pool, then borrows `borrow_amount` of
    /// `borrow_asset` against it and delivers the borrowed funds to `caller`.
    pub fn deposit_and_borrow(
        &self,
        collateral_asset: &Address,
        collateral_amount: u128,
        borrow_asset: &Address,
        borrow_amount: u128,
        caller: &Address,
    ) -> WrapperResult<WrapperEvent> {
        let result = self.locks.with_locked_pair(
            (*collateral_asset, *caller),
            (*borrow_asset, *caller),
            || {
                let Some(target) = self.config.get() else {
                    return Err(WrapperError::PoolNotConfigured.into());
                };
                self.gate
                    .pull_from(collateral_asset, caller, collateral_amount)
                    .map_err(WrapperError::TransferFailed)?;
                self.pool
                    .supply(&target, collateral_asset, collateral_amount, caller)
                    .map_err(WrapperError::SupplyFailed)?;
                let collateral_position = self
                    .ledger
                    .record_deposit(collateral_asset, caller, collateral_amount)
                    .track_caller()?;
                self.pool
                    .borrow(&target, borrow_asset, borrow_amount, caller)
                    .map_err(WrapperError::BorrowFailed)?;
                self.gate
                    .push_to(borrow_asset, caller, borrow_amount)
                    .map_err(WrapperError::TransferFailed)?;
                let debt_position = self
                    .ledger
                    .record_borrow(borrow_asset, caller, borrow_amount)
                    .track_caller()?;
                let event = CompositeTransactionEvent {
                    user: *caller,
                    asset_in: *collateral_asset,
                    amount_in: collateral_amount,
                    asset_out: *borrow_asset,
                    amount_out: borrow_amount,
                    collateral_position,
                    debt_position,
                };
                tracing::info!(?event, "deposit_and_borrow settled");
                Ok(WrapperEvent::DepositAndBorrow(event))
            },
        );
        if let Err(err) = &result {
            tracing::warn!(error = ?err, "deposit_and_borrow failed");
        }
        result
    }

    /// Pulls `debt_amount` of `debt_asset` from `caller`, repays the pool,
    /// then withdraws `collateral_amount` of `collateral_asset` from the pool
    /// and returns it to `caller`.
    ///
    /// Both amounts are checked against the recorded balances before any
    /// external call, so an underflowing request has no side effects at all.
    pub fn payback_and_withdraw(
        &self,
        collateral_asset: &Address,
        collateral_amount: u128,
        debt_asset: &Address,
        debt_amount: u128,
        caller: &Address,
    ) -> WrapperResult<WrapperEvent> {
        let result = self.locks.with_locked_pair(
            (*collateral_asset, *caller),
            (*debt_asset, *caller),
            || {
                let Some(target) = self.config.get() else {
                    return Err(WrapperError::PoolNotConfigured.into());
                };
                if debt_amount > self.ledger.borrow_amount(debt_asset, caller) {
                    return Err(WrapperError::Ledger(LedgerError::Underflow).into())
                        .with_msg("repay exceeds recorded debt");
                }
                if collateral_amount > self.ledger.deposit_amount(collateral_asset, caller) {
                    return Err(WrapperError::Ledger(LedgerError::Underflow).into())
                        .with_msg("withdraw exceeds recorded deposit");
                }
                self.gate
                    .pull_from(debt_asset, caller, debt_amount)
                    .map_err(WrapperError::TransferFailed)?;
                self.pool
                    .repay(&target, debt_asset, debt_amount, caller)
                    .map_err(WrapperError::RepayFailed)?;
                let debt_position = self
                    .ledger
                    .record_repay(debt_asset, caller, debt_amount)
                    .track_caller()?;
                self.pool
                    .withdraw(&target, collateral_asset, collateral_amount, caller)
                    .map_err(WrapperError::WithdrawFailed)?;
                self.gate
                    .push_to(collateral_asset, caller, collateral_amount)
                    .map_err(WrapperError::TransferFailed)?;
                let collateral_position = self
                    .ledger
                    .record_withdraw(collateral_asset, caller, collateral_amount)
                    .track_caller()?;
                let event = CompositeTransactionEvent {
                    user: *caller,
                    asset_in: *debt_asset,
                    amount_in: debt_amount,
                    asset_out: *collateral_asset,
                    amount_out: collateral_amount,
                    collateral_position,
                    debt_position,
                };
                tracing::info!(?event, "payback_and_withdraw settled");
                Ok(WrapperEvent::PaybackAndWithdraw(event))
            },
        );
        if let Err(err) = &result {
            tracing::warn!(error = ?err, "payback_and_withdraw failed");
        }
        result
    }
}
