use std::ops::Deref;

use num_enum::{IntoPrimitive, TryFromPrimitive};

pub type WrapperResult<T = ()> = Result<T, ErrorWithContext<WrapperError>>;

pub type LedgerResult<T = ()> = Result<T, ErrorWithContext<LedgerError>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error = {error:?}, msg = {msg:?}, stack = {stack:?}")]
pub struct ErrorWithContext<T> {
    pub error: T,
    pub msg: Vec<DisplayCow>,
    pub stack: Vec<DisplayLocation>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DisplayLocation(pub &'static std::panic::Location<'static>);

impl std::fmt::Debug for DisplayLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DisplayCow(pub std::borrow::Cow<'static, str>);

impl std::fmt::Debug for DisplayCow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_ref())
    }
}

impl<T> ErrorWithContext<T> {
    pub fn new(error: T, location: &'static std::panic::Location<'static>) -> Self {
        let mut context = Vec::with_capacity(4);
        context.push(DisplayLocation(location));
        ErrorWithContext {
            error,
            stack: context,
            msg: Vec::with_capacity(2),
        }
    }
}

impl<T> Deref for ErrorWithContext<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.error
    }
}

/// Transfer-layer failures reported by the asset transfer gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TransferError {
    InsufficientAllowance,
    InsufficientBalance,
    InsufficientCustody,
}

/// Opaque rejection from the external pool. The reason is passed through
/// untouched, the wrapper never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRejected(pub std::borrow::Cow<'static, str>);

impl PoolRejected {
    pub fn new(reason: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        PoolRejected(reason.into())
    }

    pub fn reason(&self) -> &str {
        self.0.as_ref()
    }
}

/// Ledger-layer accounting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum LedgerError {
    Underflow,
    AdditionOverflow,
}

/// The step of a composite operation that failed, with the underlying cause.
///
/// Later steps are never attempted after a failure and no compensation is
/// performed for steps already committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapperError {
    TransferFailed(TransferError),
    SupplyFailed(PoolRejected),
    BorrowFailed(PoolRejected),
    RepayFailed(PoolRejected),
    WithdrawFailed(PoolRejected),
    Ledger(LedgerError),
    PoolNotConfigured,
}

impl LedgerError {
    pub fn with_context(
        self,
        location: &'static std::panic::Location<'static>,
    ) -> ErrorWithContext<LedgerError> {
        ErrorWithContext::new(self, location)
    }
}

impl WrapperError {
    pub fn with_context(
        self,
        location: &'static std::panic::Location<'static>,
    ) -> ErrorWithContext<WrapperError> {
        ErrorWithContext::new(self, location)
    }
}

impl From<LedgerError> for WrapperError {
    fn from(error: LedgerError) -> Self {
        WrapperError::Ledger(error)
    }
}

impl From<ErrorWithContext<LedgerError>> for ErrorWithContext<WrapperError> {
    fn from(err: ErrorWithContext<LedgerError>) -> Self {
        ErrorWithContext {
            error: WrapperError::Ledger(err.error),
            msg: err.msg,
            stack: err.stack,
        }
    }
}

impl<T> From<T> for ErrorWithContext<T> {
    #[track_caller]
    fn from(error: T) -> Self {
        Self::new(error, std::panic::Location::caller())
    }
}

impl PartialEq<WrapperError> for ErrorWithContext<WrapperError> {
    fn eq(&self, other: &WrapperError) -> bool {
        self.error == *other
    }
}

impl PartialEq<LedgerError> for WrapperError {
    fn eq(&self, other: &LedgerError) -> bool {
        matches!(self, WrapperError::Ledger(err) if err == other)
    }
}

impl PartialEq<LedgerError> for ErrorWithContext<WrapperError> {
    fn eq(&self, other: &LedgerError) -> bool {
        self.error == *other
    }
}

impl PartialEq<LedgerError> for ErrorWithContext<LedgerError> {
    fn eq(&self, other: &LedgerError) -> bool {
        self.error == *other
    }
}

pub trait ResultExt: Sized {
    #[track_caller]
    fn track_caller(self) -> Self;

    fn with_msg(self, msg: impl Into<std::borrow::Cow<'static, str>>) -> Self;
}

impl<T, E> ResultExt for Result<T, ErrorWithContext<E>> {
    #[inline(always)]
    fn track_caller(self) -> Self {
        let caller = std::panic::Location::caller();
        self.map_err(|mut err| {
            err.stack.push(DisplayLocation(caller));
            err
        })
    }

    #[inline(always)]
    fn with_msg(self, msg: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        self.map_err(|mut err| {
            err.msg.push(DisplayCow(msg.into()));
            err
        })
    }
}

#[macro_export]
macro_rules! with_context {
    ( $error:expr) => {{
        let caller = std::panic::Location::caller();
        || $error.with_context(caller)
    }};
}

#[macro_export]
macro_rules! map_context {
    ($error:expr) => {{
        let caller = std::panic::Location::caller();
        |_| $error.with_context(caller)
    }};
}
