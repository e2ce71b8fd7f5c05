#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    ensure, to_binary, Addr, Binary, Deps, DepsMut, Empty, Env, Event, MessageInfo, Order,
    Response, StdResult, Uint128,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::msg::{
    BalanceResponse, ConfigResponse, EscrowResponse, ExecuteMsg, InstantiateMsg,
    NumTokensResponse, OwnerOfResponse, QueryMsg, SaleInfoResponse, TicketInfoResponse,
    TokensResponse, WithdrawResponse,
};
use crate::payment;
use crate::state::{
    ContractInfo, SaleConfig, CONTRACT_INFO, ESCROW, HOLDINGS, OWNED_TICKETS, SALE, TICKETS,
    TICKETS_SOLD,
};

// version info for migration
const CONTRACT_NAME: &str = "crates.io:ticket_sale";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = match msg.owner {
        Some(owner) => deps.api.addr_validate(&owner)?,
        None => info.sender,
    };
    let payment_token = deps.api.addr_validate(&msg.payment_token)?;

    let contract_info = ContractInfo {
        name: msg.name,
        symbol: msg.symbol,
        base_uri: msg.base_uri,
        payment_token: payment_token.clone(),
        owner: owner.clone(),
    };
    CONTRACT_INFO.save(deps.storage, &contract_info)?;
    ESCROW.save(deps.storage, &Uint128::zero())?;
    TICKETS_SOLD.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("payment_token", payment_token))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Initialize {
            start_number,
            supply_count,
            price,
            issuer,
        } => execute_initialize(deps, info, start_number, supply_count, price, issuer),
        ExecuteMsg::Purchase { ticket_number } => execute_purchase(deps, env, info, ticket_number),
        ExecuteMsg::Withdraw {} => execute_withdraw(deps, info),
    }
}

pub fn execute_initialize(
    deps: DepsMut,
    info: MessageInfo,
    start_number: u64,
    supply_count: u64,
    price: Uint128,
    issuer: Option<String>,
) -> Result<Response, ContractError> {
    let owner = CONTRACT_INFO.load(deps.storage)?.owner;
    if info.sender != owner {
        return Err(ContractError::Unauthorized {});
    }
    ensure!(
        SALE.may_load(deps.storage)?.is_none(),
        ContractError::AlreadyInitialized {}
    );
    ensure!(
        supply_count > 0 && start_number.checked_add(supply_count).is_some(),
        ContractError::InvalidDomain {
            start_number,
            supply_count,
        }
    );

    let issuer = match issuer {
        Some(issuer) => deps.api.addr_validate(&issuer)?,
        None => info.sender,
    };
    let sale = SaleConfig {
        start_number,
        supply_count,
        price,
        issuer: issuer.clone(),
    };
    SALE.save(deps.storage, &sale)?;

    Ok(Response::new()
        .add_attribute("method", "execute_initialize")
        .add_event(
            Event::new("sale_initialized")
                .add_attribute("start_number", start_number.to_string())
                .add_attribute("supply_count", supply_count.to_string())
                .add_attribute("price", price)
                .add_attribute("issuer", issuer),
        ))
}

/// Sell `ticket_number` to the sender.
///
/// Range and uniqueness are checked before any payment is attempted. The
/// ownership writes and the escrow credit are committed together with the
/// CW20 `TransferFrom` returned in the response; if that transfer fails the
/// whole execution is reverted, so a ticket is never owned without having
/// been paid for and payment is never taken without a ticket.
pub fn execute_purchase(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    ticket_number: u64,
) -> Result<Response, ContractError> {
    let buyer = info.sender;
    let sale = SALE
        .may_load(deps.storage)?
        .ok_or(ContractError::NotInitialized {})?;

    ensure!(
        sale.contains(ticket_number),
        ContractError::OutOfRange {
            ticket_number,
            start: sale.start_number,
            end: sale.end_number(),
        }
    );
    ensure!(
        !TICKETS.has(deps.storage, ticket_number),
        ContractError::AlreadySold { ticket_number }
    );

    let payment_token = CONTRACT_INFO.load(deps.storage)?.payment_token;
    let transfer = payment::pull(deps.branch(), &env, &payment_token, &buyer, sale.price)?;

    TICKETS.save(deps.storage, ticket_number, &buyer)?;
    OWNED_TICKETS.save(deps.storage, (buyer.clone(), ticket_number), &Empty {})?;
    HOLDINGS.update(deps.storage, buyer.clone(), |held| -> StdResult<_> {
        Ok(held.unwrap_or_default() + 1)
    })?;
    TICKETS_SOLD.update(deps.storage, |sold| -> StdResult<_> { Ok(sold + 1) })?;

    Ok(Response::new()
        .add_messages(transfer)
        .add_attribute("method", "execute_purchase")
        .add_attribute("ticket_number", ticket_number.to_string())
        .add_event(
            Event::new("ticket_purchased")
                .add_attribute("ticket_number", ticket_number.to_string())
                .add_attribute("buyer", buyer)
                .add_attribute("price", sale.price),
        ))
}

pub fn execute_withdraw(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let sale = SALE
        .may_load(deps.storage)?
        .ok_or(ContractError::NotInitialized {})?;
    if info.sender != sale.issuer {
        return Err(ContractError::Unauthorized {});
    }

    let payment_token = CONTRACT_INFO.load(deps.storage)?.payment_token;
    let amount = payment::escrow(deps.storage)?;
    let transfer = payment::push(deps.storage, &payment_token, &sale.issuer, amount)?;

    Ok(Response::new()
        .add_messages(transfer)
        .set_data(to_binary(&WithdrawResponse { amount })?)
        .add_attribute("method", "execute_withdraw")
        .add_attribute("amount", amount)
        .add_event(
            Event::new("withdrawn")
                .add_attribute("issuer", sale.issuer)
                .add_attribute("amount", amount),
        ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Config {} => to_binary(&query_config(deps)?),
        QueryMsg::SaleInfo {} => to_binary(&query_sale_info(deps)?),
        QueryMsg::OwnerOf { ticket_number } => to_binary(&query_owner_of(deps, ticket_number)?),
        QueryMsg::Balance { owner } => to_binary(&query_balance(deps, owner)?),
        QueryMsg::NumTokens {} => to_binary(&query_num_tokens(deps)?),
        QueryMsg::Tokens {
            owner,
            start_after,
            limit,
        } => to_binary(&query_tokens(deps, owner, start_after, limit)?),
        QueryMsg::AllTokens { start_after, limit } => {
            to_binary(&query_all_tokens(deps, start_after, limit)?)
        }
        QueryMsg::TicketInfo { ticket_number } => {
            to_binary(&query_ticket_info(deps, ticket_number)?)
        }
        QueryMsg::Escrow {} => to_binary(&query_escrow(deps)?),
    };
    Ok(res?)
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let info = CONTRACT_INFO.load(deps.storage)?;
    Ok(ConfigResponse {
        name: info.name,
        symbol: info.symbol,
        base_uri: info.base_uri,
        payment_token: info.payment_token.to_string(),
        owner: info.owner.to_string(),
    })
}

fn query_sale_info(deps: Deps) -> Result<SaleInfoResponse, ContractError> {
    let sale = SALE
        .may_load(deps.storage)?
        .ok_or(ContractError::NotInitialized {})?;
    Ok(SaleInfoResponse {
        start_number: sale.start_number,
        supply_count: sale.supply_count,
        price: sale.price,
        issuer: sale.issuer.to_string(),
    })
}

fn load_owner(deps: Deps, ticket_number: u64) -> Result<Addr, ContractError> {
    TICKETS
        .may_load(deps.storage, ticket_number)?
        .ok_or(ContractError::TicketNotSold { ticket_number })
}

fn query_owner_of(deps: Deps, ticket_number: u64) -> Result<OwnerOfResponse, ContractError> {
    let owner = load_owner(deps, ticket_number)?;
    Ok(OwnerOfResponse {
        owner: owner.to_string(),
    })
}

fn query_balance(deps: Deps, owner: String) -> StdResult<BalanceResponse> {
    // an address that cannot hold tickets simply holds none
    let count = match deps.api.addr_validate(&owner) {
        Ok(owner) => HOLDINGS.may_load(deps.storage, owner)?.unwrap_or_default(),
        Err(_) => 0,
    };
    Ok(BalanceResponse { count })
}

fn query_num_tokens(deps: Deps) -> StdResult<NumTokensResponse> {
    let count = TICKETS_SOLD.may_load(deps.storage)?.unwrap_or_default();
    Ok(NumTokensResponse { count })
}

// Limits for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

fn query_tokens(
    deps: Deps,
    owner: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<TokensResponse> {
    let owner = deps.api.addr_validate(&owner)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);
    let tokens: StdResult<Vec<_>> = OWNED_TICKETS
        .prefix(owner)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(ticket_number, _)| ticket_number))
        .collect();
    Ok(TokensResponse { tokens: tokens? })
}

fn query_all_tokens(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<TokensResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);
    let tokens: StdResult<Vec<_>> = TICKETS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(ticket_number, _)| ticket_number))
        .collect();
    Ok(TokensResponse { tokens: tokens? })
}

fn query_ticket_info(deps: Deps, ticket_number: u64) -> Result<TicketInfoResponse, ContractError> {
    let owner = load_owner(deps, ticket_number)?;
    let base_uri = CONTRACT_INFO.load(deps.storage)?.base_uri;
    Ok(TicketInfoResponse {
        owner: owner.to_string(),
        token_uri: format!("{}/{}", base_uri.trim_end_matches('/'), ticket_number),
    })
}

fn query_escrow(deps: Deps) -> StdResult<EscrowResponse> {
    Ok(EscrowResponse {
        amount: payment::escrow(deps.storage)?,
    })
}
