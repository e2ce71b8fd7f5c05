use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Sale not initialized")]
    NotInitialized {},

    #[error("Sale already initialized")]
    AlreadyInitialized {},

    #[error("Invalid ticket domain: start {start_number}, supply {supply_count}")]
    InvalidDomain { start_number: u64, supply_count: u64 },

    #[error("Ticket {ticket_number} outside [{start}, {end})")]
    OutOfRange {
        ticket_number: u64,
        start: u64,
        end: u64,
    },

    #[error("Ticket {ticket_number} already sold")]
    AlreadySold { ticket_number: u64 },

    #[error("Ticket {ticket_number} not sold")]
    TicketNotSold { ticket_number: u64 },
}

/// Failures of the payment token leg. Nothing is written when one of these is returned.
#[derive(Error, Debug, PartialEq)]
pub enum PaymentError {
    #[error("Insufficient allowance: needed {needed}, available {available}")]
    InsufficientAllowance { needed: Uint128, available: Uint128 },

    #[error("Insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: Uint128, available: Uint128 },

    #[error("Insufficient escrow: requested {requested}, escrow {escrow}")]
    InsufficientEscrow { requested: Uint128, escrow: Uint128 },
}
