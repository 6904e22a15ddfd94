use borsh::{BorshDeserialize, BorshSerialize};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{address::Address, state::position::Position};

#[repr(u8)]
#[derive(
    Clone, Copy, Debug, PartialEq, BorshSerialize, BorshDeserialize, IntoPrimitive, TryFromPrimitive,
)]
pub enum WrapperEventTag {
    SetPool,
    DepositAndBorrow,
    PaybackAndWithdraw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
#[cfg_attr(
    feature = "client",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SetPoolEvent {
    pub previous: Option<Address>,
    pub pool: Address,
}

/// Emitted on success of the two composite operations.
///
/// `asset_in`/`amount_in` is what the caller handed over (collateral on the
/// entry path, debt repayment on the exit path), `asset_out`/`amount_out`
/// what the caller received back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
#[cfg_attr(
    feature = "client",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CompositeTransactionEvent {
    pub user: Address,
    pub asset_in: Address,
    pub amount_in: u128,
    pub asset_out: Address,
    pub amount_out: u128,
    pub collateral_position: Position,
    pub debt_position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "client",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "event")
)]
pub enum WrapperEvent {
    SetPool(SetPoolEvent),
    DepositAndBorrow(CompositeTransactionEvent),
    PaybackAndWithdraw(CompositeTransactionEvent),
}

impl BorshSerialize for WrapperEvent {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> Result<(), std::io::Error> {
        match self {
            WrapperEvent::SetPool(event) => {
                WrapperEventTag::SetPool.serialize(writer)?;
                event.serialize(writer)
            }
            WrapperEvent::DepositAndBorrow(event) => {
                WrapperEventTag::DepositAndBorrow.serialize(writer)?;
                event.serialize(writer)
            }
            WrapperEvent::PaybackAndWithdraw(event) => {
                WrapperEventTag::PaybackAndWithdraw.serialize(writer)?;
                event.serialize(writer)
            }
        }
    }
}

impl BorshDeserialize for WrapperEvent {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> Result<Self, std::io::Error> {
        let tag = WrapperEventTag::deserialize_reader(reader)?;
        match tag {
            WrapperEventTag::SetPool => Ok(WrapperEvent::SetPool(<_>::deserialize_reader(reader)?)),
            WrapperEventTag::DepositAndBorrow => Ok(WrapperEvent::DepositAndBorrow(
                <_>::deserialize_reader(reader)?,
            )),
            WrapperEventTag::PaybackAndWithdraw => Ok(WrapperEvent::PaybackAndWithdraw(
                <_>::deserialize_reader(reader)?,
            )),
        }
    }
}
