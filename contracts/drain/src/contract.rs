use cosmwasm_std::{
    entry_point, to_json_binary, Addr, BankMsg, Binary, Coin, Deps, DepsMut, Env, MessageInfo,
    Order, Reply, Response, StdError, StdResult, Storage, SubMsg, Uint128, Uint64,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;
use shared::payload::{WithdrawPayload, EXPIRATION_HORIZON_SECS};
use shared::{AccountAddress, OwnedWalletsResponse, RegistryQueryMsg};

use crate::error::ContractError;
use crate::msg::{
    AllowedWalletsResponse, BudgetResponse, ExecuteMsg, InstantiateMsg, PayloadResponse,
    QueryMsg, StateResponse, WalletResponse, WithdrawalRequestResponse,
    WithdrawalRequestsResponse,
};
use crate::state::{
    PendingWithdrawal, RequestStatus, State, Wallet, WithdrawalRequest, ALLOWED_WALLETS, BUDGETS,
    PENDING_WITHDRAWAL, REQUESTS, STATE, WALLETS,
};

const CONTRACT_NAME: &str = "crates.io:drain";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const WITHDRAW_REPLY_ID: u64 = 1;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let state = State {
        admin: parse_account(info.sender.as_str())?.to_addr(),
        custodian: env.contract.address,
        registry: deps.api.addr_validate(&msg.registry)?,
        module_address: parse_account(&msg.module_address)?.to_addr(),
        chain_id: msg.chain_id,
        paused: false,
    };
    STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", state.admin.as_str())
        .add_attribute("custodian", state.custodian.as_str())
        .add_attribute("registry", state.registry.as_str())
        .add_attribute("chain_id", state.chain_id.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AllowWallet { wallet, owner } => {
            execute_allow_wallet(deps, info, wallet, owner)
        }
        ExecuteMsg::DisallowWallet { wallet } => execute_disallow_wallet(deps, info, wallet),
        ExecuteMsg::GrantBudget {
            wallet,
            asset,
            amount,
        } => execute_grant_budget(deps, info, wallet, asset, amount),
        ExecuteMsg::CreateWithdrawalRequest {
            wallet,
            sequence_number,
            receiver,
            asset,
            amount,
        } => execute_create_withdrawal_request(
            deps,
            env,
            info,
            wallet,
            sequence_number,
            receiver,
            asset,
            amount,
        ),
        ExecuteMsg::Withdraw { request_id } => execute_withdraw(deps, info, request_id),
    }
}

pub fn execute_allow_wallet(
    deps: DepsMut,
    info: MessageInfo,
    wallet: String,
    owner: String,
) -> Result<Response, ContractError> {
    let state = load_as_admin(deps.storage, &info.sender)?;
    let wallet = parse_account(&wallet)?;
    let owner = parse_account(&owner)?;

    if !is_owner_of(deps.as_ref(), &state.registry, &owner, &wallet)? {
        return Err(ContractError::NotWalletOwner {});
    }

    let wallet_addr = wallet.to_addr();
    if ALLOWED_WALLETS.has(deps.storage, &wallet_addr) {
        return Err(ContractError::WalletAlreadyAllowed {});
    }
    ALLOWED_WALLETS.save(deps.storage, &wallet_addr, &true)?;

    Ok(Response::new()
        .add_attribute("method", "allow_wallet")
        .add_attribute("wallet", wallet_addr)
        .add_attribute("owner", owner.to_string()))
}

pub fn execute_disallow_wallet(
    deps: DepsMut,
    info: MessageInfo,
    wallet: String,
) -> Result<Response, ContractError> {
    load_as_admin(deps.storage, &info.sender)?;
    let wallet_addr = parse_account(&wallet)?.to_addr();

    if !ALLOWED_WALLETS.has(deps.storage, &wallet_addr) {
        return Err(ContractError::AllowedWalletNotFound {});
    }
    // Budgets and requests stay; re-allowing the wallet makes them usable again.
    ALLOWED_WALLETS.remove(deps.storage, &wallet_addr);

    Ok(Response::new()
        .add_attribute("method", "disallow_wallet")
        .add_attribute("wallet", wallet_addr))
}

pub fn execute_grant_budget(
    deps: DepsMut,
    info: MessageInfo,
    wallet: String,
    asset: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    load_as_admin(deps.storage, &info.sender)?;
    let wallet_addr = parse_account(&wallet)?.to_addr();

    if !ALLOWED_WALLETS.has(deps.storage, &wallet_addr) {
        return Err(ContractError::WalletNotAllowed {});
    }

    let remaining = BUDGETS.update(
        deps.storage,
        (&wallet_addr, asset.as_str()),
        |budget| -> Result<_, ContractError> {
            Ok(budget.unwrap_or_default().checked_add(amount)?)
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "grant_budget")
        .add_attribute("wallet", wallet_addr)
        .add_attribute("asset", asset)
        .add_attribute("amount", amount)
        .add_attribute("remaining", remaining))
}

#[allow(clippy::too_many_arguments)]
pub fn execute_create_withdrawal_request(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    wallet: String,
    sequence_number: u64,
    receiver: String,
    asset: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let state = STATE.load(deps.storage)?;
    let wallet = parse_account(&wallet)?;
    let wallet_addr = wallet.to_addr();
    let receiver_addr = parse_account(&receiver)?.to_addr();

    if !ALLOWED_WALLETS.has(deps.storage, &wallet_addr) {
        return Err(ContractError::WalletNotAllowed {});
    }

    let requester = parse_account(info.sender.as_str())
        .map_err(|_| ContractError::NotWalletOwner {})?;
    if !is_owner_of(deps.as_ref(), &state.registry, &requester, &wallet)? {
        return Err(ContractError::NotWalletOwner {});
    }

    // A missing entry is "never granted", distinct from a spent budget.
    let budget_key = (&wallet_addr, asset.as_str());
    let remaining = BUDGETS
        .may_load(deps.storage, budget_key)?
        .ok_or(ContractError::AssetNotPermitted {})?;
    if amount > remaining {
        return Err(ContractError::BudgetExceeded {
            requested: amount,
            remaining,
        });
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let mut record = WALLETS
        .may_load(deps.storage, &wallet_addr)?
        .unwrap_or_else(|| Wallet {
            address: wallet_addr.clone(),
            request_count: 0,
        });
    let request_id = record.request_count;
    let (payload, expiration) = build_payload(&state, &env, wallet, sequence_number, request_id)?;

    record.request_count = Uint64::new(request_id).checked_add(Uint64::new(1))?.u64();
    let remaining = remaining.checked_sub(amount)?;
    BUDGETS.save(deps.storage, budget_key, &remaining)?;

    let request = WithdrawalRequest {
        receiver: receiver_addr,
        asset,
        amount,
        status: RequestStatus::Created,
        payload,
    };
    REQUESTS.save(deps.storage, (&wallet_addr, request_id), &request)?;
    WALLETS.save(deps.storage, &wallet_addr, &record)?;

    Ok(Response::new()
        .add_attribute("method", "create_withdrawal_request")
        .add_attribute("wallet", wallet_addr.as_str())
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("receiver", request.receiver.as_str())
        .add_attribute("asset", request.asset.as_str())
        .add_attribute("amount", amount)
        .add_attribute("remaining", remaining)
        .add_attribute("expiration", expiration.to_string())
        .add_attribute("payload", request.payload.to_base64()))
}

pub fn execute_withdraw(
    deps: DepsMut,
    info: MessageInfo,
    request_id: u64,
) -> Result<Response, ContractError> {
    // The caller is the wallet itself.
    let wallet_addr = parse_account(info.sender.as_str())
        .map_err(|_| ContractError::WalletNotAllowed {})?
        .to_addr();
    if !ALLOWED_WALLETS.has(deps.storage, &wallet_addr) {
        return Err(ContractError::WalletNotAllowed {});
    }

    let wallet = WALLETS
        .may_load(deps.storage, &wallet_addr)?
        .ok_or(ContractError::WalletNotFound {})?;
    if request_id >= wallet.request_count {
        return Err(ContractError::InvalidRequestId { request_id });
    }

    let mut request = REQUESTS
        .may_load(deps.storage, (&wallet_addr, request_id))?
        .ok_or(ContractError::InvalidRequestId { request_id })?;
    if request.status != RequestStatus::Created {
        return Err(ContractError::RequestAlreadyExecuted { request_id });
    }

    let funds = Coin {
        denom: request.asset.clone(),
        amount: request.amount,
    };
    if info.funds.len() != 1 || info.funds[0] != funds {
        return Err(ContractError::FundsMismatch {
            amount: funds.amount,
            denom: funds.denom,
        });
    }

    let balance_before = deps
        .querier
        .query_balance(request.receiver.to_string(), request.asset.clone())?
        .amount;

    // Reverted together with the transfer if the reply rejects the balance.
    request.status = RequestStatus::Executed;
    REQUESTS.save(deps.storage, (&wallet_addr, request_id), &request)?;

    PENDING_WITHDRAWAL.save(
        deps.storage,
        &PendingWithdrawal {
            wallet: wallet_addr.clone(),
            request_id,
            receiver: request.receiver.clone(),
            asset: request.asset.clone(),
            amount: request.amount,
            balance_before,
        },
    )?;

    let send = BankMsg::Send {
        to_address: request.receiver.to_string(),
        amount: vec![funds],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(send, WITHDRAW_REPLY_ID))
        .add_attribute("method", "withdraw")
        .add_attribute("wallet", wallet_addr)
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("receiver", request.receiver)
        .add_attribute("amount", request.amount))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        WITHDRAW_REPLY_ID => reply_withdraw(deps),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

fn reply_withdraw(deps: DepsMut) -> Result<Response, ContractError> {
    let pending = PENDING_WITHDRAWAL
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingWithdrawal {})?;
    PENDING_WITHDRAWAL.remove(deps.storage);

    let expected = pending.balance_before.checked_add(pending.amount)?;
    let actual = deps
        .querier
        .query_balance(pending.receiver.to_string(), pending.asset.clone())?
        .amount;

    // Any transfer deduction fails here and reverts the whole withdrawal.
    if actual != expected {
        return Err(ContractError::InvalidBalance { expected, actual });
    }

    Ok(Response::new()
        .add_attribute("method", "withdraw_settled")
        .add_attribute("wallet", pending.wallet)
        .add_attribute("request_id", pending.request_id.to_string())
        .add_attribute("receiver_balance", actual))
}

fn parse_account(input: &str) -> Result<AccountAddress, ContractError> {
    Ok(input.parse::<AccountAddress>()?)
}

fn load_as_admin(storage: &dyn Storage, sender: &Addr) -> Result<State, ContractError> {
    let state = STATE.load(storage)?;
    match sender.as_str().parse::<AccountAddress>() {
        Ok(account) if account.to_addr() == state.admin => Ok(state),
        _ => Err(ContractError::Unauthorized {}),
    }
}

fn is_owner_of(
    deps: Deps,
    registry: &Addr,
    owner: &AccountAddress,
    wallet: &AccountAddress,
) -> StdResult<bool> {
    let owned: OwnedWalletsResponse = deps.querier.query_wasm_smart(
        registry.to_string(),
        &RegistryQueryMsg::OwnedWallets {
            owner: owner.to_string(),
        },
    )?;
    Ok(owned.owns(wallet))
}

/// Payload for `wallet`'s request at the current block time, and its expiration.
fn build_payload(
    state: &State,
    env: &Env,
    wallet: AccountAddress,
    sequence_number: u64,
    request_id: u64,
) -> Result<(Binary, u64), ContractError> {
    let expiration = Uint64::new(env.block.time.seconds())
        .checked_add(Uint64::new(EXPIRATION_HORIZON_SECS))?
        .u64();

    let payload = WithdrawPayload {
        sender: wallet,
        sequence_number,
        module_address: parse_account(state.module_address.as_str())?,
        request_id,
        expiration_timestamp_secs: expiration,
        chain_id: state.chain_id,
    };

    Ok((Binary::from(payload.encode()), expiration))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::IsInitialized {} => to_json_binary(&STATE.may_load(deps.storage)?.is_some()),
        QueryMsg::IsPaused {} => to_json_binary(&STATE.load(deps.storage)?.paused),
        QueryMsg::StateFields {} => to_json_binary(&query_state(deps)?),
        QueryMsg::IsWalletAllowed { wallet } => {
            to_json_binary(&query_is_wallet_allowed(deps, wallet)?)
        }
        QueryMsg::AllowedWallets { start_after, limit } => {
            to_json_binary(&query_allowed_wallets(deps, start_after, limit)?)
        }
        QueryMsg::Wallet { wallet } => to_json_binary(&query_wallet(deps, wallet)?),
        QueryMsg::RemainingBudget { wallet, asset } => {
            to_json_binary(&query_remaining_budget(deps, wallet, asset)?)
        }
        QueryMsg::WithdrawalRequests { wallet } => {
            to_json_binary(&query_withdrawal_requests(deps, wallet)?)
        }
        QueryMsg::WithdrawalRequest { wallet, request_id } => {
            to_json_binary(&query_withdrawal_request(deps, wallet, request_id)?)
        }
        QueryMsg::PreviewPayload {
            wallet,
            sequence_number,
            request_id,
        } => to_json_binary(&query_preview_payload(
            deps,
            env,
            wallet,
            sequence_number,
            request_id,
        )?),
    }
}

fn query_state(deps: Deps) -> StdResult<StateResponse> {
    let state = STATE.load(deps.storage)?;
    Ok(StateResponse {
        admin: state.admin,
        custodian: state.custodian,
        registry: state.registry,
        module_address: state.module_address,
        chain_id: state.chain_id,
        paused: state.paused,
    })
}

fn query_is_wallet_allowed(deps: Deps, wallet: String) -> StdResult<bool> {
    let wallet_addr = query_account(&wallet)?.to_addr();
    Ok(ALLOWED_WALLETS.has(deps.storage, &wallet_addr))
}

fn query_allowed_wallets(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AllowedWalletsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_after = start_after
        .map(|wallet| query_account(&wallet).map(|account| account.to_addr()))
        .transpose()?;
    let start = start_after.as_ref().map(Bound::exclusive);

    let wallets = ALLOWED_WALLETS
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<Vec<Addr>>>()?;

    Ok(AllowedWalletsResponse { wallets })
}

fn query_wallet(deps: Deps, wallet: String) -> StdResult<WalletResponse> {
    let wallet_addr = query_account(&wallet)?.to_addr();
    let record = WALLETS.load(deps.storage, &wallet_addr)?;
    let withdrawals = load_requests(deps, &wallet_addr)?;

    Ok(WalletResponse {
        address: record.address,
        request_count: record.request_count,
        withdrawals,
    })
}

fn query_remaining_budget(deps: Deps, wallet: String, asset: String) -> StdResult<BudgetResponse> {
    let wallet_addr = query_account(&wallet)?.to_addr();
    if !ALLOWED_WALLETS.has(deps.storage, &wallet_addr) {
        return Err(StdError::generic_err(
            ContractError::WalletNotAllowed {}.to_string(),
        ));
    }

    // Reads report a missing entry as zero; request creation treats it as an error.
    let amount = BUDGETS
        .may_load(deps.storage, (&wallet_addr, asset.as_str()))?
        .unwrap_or_default();

    Ok(BudgetResponse {
        wallet: wallet_addr,
        asset,
        amount,
    })
}

fn query_withdrawal_requests(deps: Deps, wallet: String) -> StdResult<WithdrawalRequestsResponse> {
    let wallet_addr = query_account(&wallet)?.to_addr();
    Ok(WithdrawalRequestsResponse {
        requests: load_requests(deps, &wallet_addr)?,
    })
}

fn query_withdrawal_request(
    deps: Deps,
    wallet: String,
    request_id: u64,
) -> StdResult<WithdrawalRequestResponse> {
    let wallet_addr = query_account(&wallet)?.to_addr();
    let request = REQUESTS.load(deps.storage, (&wallet_addr, request_id))?;
    Ok(request_to_response(request_id, request))
}

fn query_preview_payload(
    deps: Deps,
    env: Env,
    wallet: String,
    sequence_number: u64,
    request_id: u64,
) -> StdResult<PayloadResponse> {
    let wallet = query_account(&wallet)?;
    let state = STATE.load(deps.storage)?;
    let (payload, expiration) = build_payload(&state, &env, wallet, sequence_number, request_id)
        .map_err(|err| StdError::generic_err(err.to_string()))?;

    Ok(PayloadResponse {
        payload,
        expiration,
    })
}

fn query_account(input: &str) -> StdResult<AccountAddress> {
    input
        .parse::<AccountAddress>()
        .map_err(|err| StdError::generic_err(err.to_string()))
}

fn load_requests(deps: Deps, wallet: &Addr) -> StdResult<Vec<WithdrawalRequestResponse>> {
    REQUESTS
        .prefix(wallet)
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(id, request)| request_to_response(id, request)))
        .collect()
}

fn request_to_response(id: u64, request: WithdrawalRequest) -> WithdrawalRequestResponse {
    WithdrawalRequestResponse {
        id,
        receiver: request.receiver,
        asset: request.asset,
        amount: request.amount,
        status: request.status,
        payload: request.payload,
    }
}
