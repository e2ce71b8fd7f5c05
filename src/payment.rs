//! Custody of the CW20 payment token.
//!
//! `ESCROW` mirrors the token balance this contract holds on behalf of the
//! issuer. It only moves through [`pull`] and [`push`], and each of them
//! returns the token message that makes the bookkeeping true. Callers must
//! return that message in the same `Response` so a failed transfer reverts
//! the ledger write together with everything else in the transaction.

use cosmwasm_std::{
    ensure, Addr, CosmosMsg, DepsMut, Env, StdError, StdResult, Storage, Uint128,
};
use cw20::{AllowanceResponse, BalanceResponse as TokenBalance, Cw20QueryMsg};
use cw_asset::Asset;

use crate::error::{ContractError, PaymentError};
use crate::state::ESCROW;

pub fn escrow(storage: &dyn Storage) -> StdResult<Uint128> {
    Ok(ESCROW.may_load(storage)?.unwrap_or_default())
}

/// Take `amount` of `token` from `from` into custody using the allowance
/// `from` granted this contract.
///
/// Allowance and balance are checked up front so the caller gets a typed
/// error instead of a failed sub-message. Returns `None` for a zero amount,
/// which CW20 contracts refuse to transfer.
pub fn pull(
    deps: DepsMut,
    env: &Env,
    token: &Addr,
    from: &Addr,
    amount: Uint128,
) -> Result<Option<CosmosMsg>, ContractError> {
    if amount.is_zero() {
        return Ok(None);
    }

    let allowance: AllowanceResponse = deps.querier.query_wasm_smart(
        token,
        &Cw20QueryMsg::Allowance {
            owner: from.to_string(),
            spender: env.contract.address.to_string(),
        },
    )?;
    let available = if allowance.expires.is_expired(&env.block) {
        Uint128::zero()
    } else {
        allowance.allowance
    };
    ensure!(
        available >= amount,
        PaymentError::InsufficientAllowance {
            needed: amount,
            available,
        }
    );

    let balance: TokenBalance = deps.querier.query_wasm_smart(
        token,
        &Cw20QueryMsg::Balance {
            address: from.to_string(),
        },
    )?;
    ensure!(
        balance.balance >= amount,
        PaymentError::InsufficientFunds {
            needed: amount,
            available: balance.balance,
        }
    );

    let escrow = escrow(deps.storage)?
        .checked_add(amount)
        .map_err(StdError::from)?;
    ESCROW.save(deps.storage, &escrow)?;
    deps.api
        .debug(&format!("payment: pulled {} from {}, escrow {}", amount, from, escrow));

    let msg = Asset::cw20(token.clone(), amount).transfer_from_msg(from, &env.contract.address)?;
    Ok(Some(msg))
}

/// Release `amount` from custody to `to`.
pub fn push(
    storage: &mut dyn Storage,
    token: &Addr,
    to: &Addr,
    amount: Uint128,
) -> Result<Option<CosmosMsg>, ContractError> {
    let escrow = escrow(storage)?;
    ensure!(
        amount <= escrow,
        PaymentError::InsufficientEscrow {
            requested: amount,
            escrow,
        }
    );
    if amount.is_zero() {
        return Ok(None);
    }

    ESCROW.save(storage, &(escrow - amount))?;
    let msg = Asset::cw20(token.clone(), amount).transfer_msg(to)?;
    Ok(Some(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_token;
    use cosmwasm_std::testing::{mock_dependencies, mock_env};
    use cosmwasm_std::{to_binary, WasmMsg};
    use cw20::Cw20ExecuteMsg;

    #[test]
    fn test_pull_records_escrow_and_builds_transfer_from() {
        let mut deps = mock_dependencies();
        let env = mock_env();
        mock_token(&mut deps, 10, 10);
        let token = Addr::unchecked("token");
        let buyer = Addr::unchecked("buyer");

        let msg = pull(deps.as_mut(), &env, &token, &buyer, Uint128::new(5))
            .unwrap()
            .unwrap();

        assert_eq!(escrow(&deps.storage).unwrap(), Uint128::new(5));
        assert_eq!(
            msg,
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: "token".to_string(),
                msg: to_binary(&Cw20ExecuteMsg::TransferFrom {
                    owner: "buyer".to_string(),
                    recipient: env.contract.address.to_string(),
                    amount: Uint128::new(5),
                })
                .unwrap(),
                funds: vec![],
            })
        );
    }

    #[test]
    fn test_pull_rejects_short_allowance_without_writing() {
        let mut deps = mock_dependencies();
        let env = mock_env();
        mock_token(&mut deps, 4, 100);

        let err = pull(
            deps.as_mut(),
            &env,
            &Addr::unchecked("token"),
            &Addr::unchecked("buyer"),
            Uint128::new(5),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ContractError::Payment(PaymentError::InsufficientAllowance {
                needed: Uint128::new(5),
                available: Uint128::new(4),
            })
        );
        assert_eq!(escrow(&deps.storage).unwrap(), Uint128::zero());
    }

    #[test]
    fn test_pull_rejects_short_balance_without_writing() {
        let mut deps = mock_dependencies();
        let env = mock_env();
        mock_token(&mut deps, 100, 3);

        let err = pull(
            deps.as_mut(),
            &env,
            &Addr::unchecked("token"),
            &Addr::unchecked("buyer"),
            Uint128::new(5),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ContractError::Payment(PaymentError::InsufficientFunds {
                needed: Uint128::new(5),
                available: Uint128::new(3),
            })
        );
        assert_eq!(escrow(&deps.storage).unwrap(), Uint128::zero());
    }

    #[test]
    fn test_zero_amounts_produce_no_message() {
        let mut deps = mock_dependencies();
        let env = mock_env();
        let token = Addr::unchecked("token");
        let who = Addr::unchecked("who");

        // no querier mock: a zero pull must not query the token at all
        assert_eq!(pull(deps.as_mut(), &env, &token, &who, Uint128::zero()).unwrap(), None);
        assert_eq!(push(&mut deps.storage, &token, &who, Uint128::zero()).unwrap(), None);
    }

    #[test]
    fn test_push_cannot_exceed_escrow() {
        let mut deps = mock_dependencies();
        ESCROW.save(&mut deps.storage, &Uint128::new(7)).unwrap();
        let token = Addr::unchecked("token");
        let issuer = Addr::unchecked("issuer");

        let err = push(&mut deps.storage, &token, &issuer, Uint128::new(8)).unwrap_err();
        assert_eq!(
            err,
            ContractError::Payment(PaymentError::InsufficientEscrow {
                requested: Uint128::new(8),
                escrow: Uint128::new(7),
            })
        );
        assert_eq!(escrow(&deps.storage).unwrap(), Uint128::new(7));

        let msg = push(&mut deps.storage, &token, &issuer, Uint128::new(7))
            .unwrap()
            .unwrap();
        assert_eq!(escrow(&deps.storage).unwrap(), Uint128::zero());
        assert_eq!(
            msg,
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: "token".to_string(),
                msg: to_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: "issuer".to_string(),
                    amount: Uint128::new(7),
                })
                .unwrap(),
                funds: vec![],
            })
        );
    }
}
