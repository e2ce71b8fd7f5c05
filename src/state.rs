use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct ContractInfo {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
    pub payment_token: Addr,
    pub owner: Addr,
}

/// Sale terms, written once by `initialize`. Tickets are numbered
/// `start_number..start_number + supply_count`.
#[cw_serde]
pub struct SaleConfig {
    pub start_number: u64,
    pub supply_count: u64,
    pub price: Uint128,
    pub issuer: Addr,
}

impl SaleConfig {
    /// Exclusive upper bound of the ticket domain. Overflow is rejected at initialize.
    pub fn end_number(&self) -> u64 {
        self.start_number + self.supply_count
    }

    pub fn contains(&self, ticket_number: u64) -> bool {
        ticket_number >= self.start_number && ticket_number < self.end_number()
    }
}

pub const CONTRACT_INFO: Item<ContractInfo> = Item::new("contract_info");
pub const SALE: Item<SaleConfig> = Item::new("sale");

// ticket number -> owner
pub const TICKETS: Map<u64, Addr> = Map::new("tickets");
// owner -> tickets held
pub const HOLDINGS: Map<Addr, u64> = Map::new("holdings");
// (owner, ticket number), for per-owner listing
pub const OWNED_TICKETS: Map<(Addr, u64), Empty> = Map::new("owned_tickets");
pub const TICKETS_SOLD: Item<u64> = Item::new("tickets_sold");

pub const ESCROW: Item<Uint128> = Item::new("escrow");
