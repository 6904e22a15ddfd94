pub mod ledger;
pub mod position;
