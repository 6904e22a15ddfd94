use crate::{
    error::{LedgerError, LedgerResult},
    with_context,
};

pub trait SafeMath<Other = Self, Output = Self>: Sized {
    #[track_caller]
    fn safe_add(self, other: Other) -> LedgerResult<Output>;
    #[track_caller]
    fn safe_sub(self, other: Other) -> LedgerResult<Output>;
}

impl SafeMath for u128 {
    fn safe_add(self, other: Self) -> LedgerResult<Self> {
        self.checked_add(other)
            .ok_or_else(with_context!(LedgerError::AdditionOverflow))
    }

    fn safe_sub(self, other: Self) -> LedgerResult<Self> {
        self.checked_sub(other)
            .ok_or_else(with_context!(LedgerError::Underflow))
    }
}
