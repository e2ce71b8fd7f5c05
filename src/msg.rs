use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
    /// CW20 contract the tickets are priced in
    pub payment_token: String,
    pub owner: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    Initialize {
        start_number: u64,
        supply_count: u64,
        price: Uint128,
        issuer: Option<String>,
    },
    /// Buy `ticket_number` for the sender. Requires a CW20 allowance of at
    /// least the ticket price granted to this contract.
    Purchase { ticket_number: u64 },
    /// Send the whole escrow to the issuer.
    Withdraw {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(SaleInfoResponse)]
    SaleInfo {},
    #[returns(OwnerOfResponse)]
    OwnerOf { ticket_number: u64 },
    #[returns(BalanceResponse)]
    Balance { owner: String },
    #[returns(NumTokensResponse)]
    NumTokens {},
    #[returns(TokensResponse)]
    Tokens {
        owner: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(TokensResponse)]
    AllTokens {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(TicketInfoResponse)]
    TicketInfo { ticket_number: u64 },
    #[returns(EscrowResponse)]
    Escrow {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
    pub payment_token: String,
    pub owner: String,
}

#[cw_serde]
pub struct SaleInfoResponse {
    pub start_number: u64,
    pub supply_count: u64,
    pub price: Uint128,
    pub issuer: String,
}

#[cw_serde]
pub struct OwnerOfResponse {
    pub owner: String,
}

#[cw_serde]
pub struct BalanceResponse {
    pub count: u64,
}

#[cw_serde]
pub struct NumTokensResponse {
    pub count: u64,
}

#[cw_serde]
pub struct TokensResponse {
    pub tokens: Vec<u64>,
}

#[cw_serde]
pub struct TicketInfoResponse {
    pub owner: String,
    pub token_uri: String,
}

#[cw_serde]
pub struct EscrowResponse {
    pub amount: Uint128,
}

/// Set as response data by `Withdraw`.
#[cw_serde]
pub struct WithdrawResponse {
    pub amount: Uint128,
}
