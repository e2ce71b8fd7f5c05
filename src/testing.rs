use cosmwasm_std::testing::{MockApi, MockQuerier, MockStorage};
use cosmwasm_std::{
    from_binary, to_binary, ContractResult, OwnedDeps, SystemError, SystemResult, Uint128,
    WasmQuery,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20QueryMsg, Expiration};

/// Answer CW20 allowance and balance queries with fixed amounts for every
/// account.
pub fn mock_token(
    deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier>,
    allowance: u128,
    balance: u128,
) {
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => {
            let res = match from_binary(msg) {
                Ok(Cw20QueryMsg::Allowance { .. }) => to_binary(&AllowanceResponse {
                    allowance: Uint128::new(allowance),
                    expires: Expiration::Never {},
                }),
                Ok(Cw20QueryMsg::Balance { .. }) => to_binary(&BalanceResponse {
                    balance: Uint128::new(balance),
                }),
                _ => {
                    return SystemResult::Err(SystemError::UnsupportedRequest {
                        kind: "cw20 query".to_string(),
                    })
                }
            };
            SystemResult::Ok(ContractResult::from(res))
        }
        _ => SystemResult::Err(SystemError::UnsupportedRequest {
            kind: "wasm".to_string(),
        }),
    });
}
