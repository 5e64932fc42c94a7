use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct State {
    /// Fixed administrator identity (the instantiator)
    pub admin: Addr,
    /// Custodial account funds pass through on withdrawal
    pub custodian: Addr,
    /// Multisig ownership registry contract
    pub registry: Addr,
    /// Module address written into withdraw payloads
    pub module_address: Addr,
    /// Chain id of the network the multisig signs on
    pub chain_id: u8,
    /// Stored but not consulted by any operation
    pub paused: bool,
}

#[cw_serde]
pub enum RequestStatus {
    Created,
    Executed,
}

#[cw_serde]
pub struct WithdrawalRequest {
    pub receiver: Addr,
    /// Bank denomination
    pub asset: String,
    pub amount: Uint128,
    pub status: RequestStatus,
    /// Correlation payload, frozen at creation
    pub payload: Binary,
}

#[cw_serde]
pub struct Wallet {
    pub address: Addr,
    /// Number of requests ever created, also the next request id
    pub request_count: u64,
}

/// Balance check carried from `Withdraw` into its reply
#[cw_serde]
pub struct PendingWithdrawal {
    pub wallet: Addr,
    pub request_id: u64,
    pub receiver: Addr,
    pub asset: String,
    pub amount: Uint128,
    pub balance_before: Uint128,
}

pub const STATE: Item<State> = Item::new("state");

/// Whitelisted multisig wallets
pub const ALLOWED_WALLETS: Map<&Addr, bool> = Map::new("allowed_wallets");

/// Remaining budget
/// Key: (wallet, asset)
pub const BUDGETS: Map<(&Addr, &str), Uint128> = Map::new("budgets");

/// Wallet records, created on first request
pub const WALLETS: Map<&Addr, Wallet> = Map::new("wallets");

/// Withdrawal requests
/// Key: (wallet, request_id)
pub const REQUESTS: Map<(&Addr, u64), WithdrawalRequest> = Map::new("requests");

pub const PENDING_WITHDRAWAL: Item<PendingWithdrawal> = Item::new("pending_withdrawal");
