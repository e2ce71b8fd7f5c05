pub mod contract;
mod error;
pub mod msg;
pub mod payment;
pub mod state;

#[cfg(test)]
mod testing;

pub use crate::error::{ContractError, PaymentError};
