use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use crate::state::RequestStatus;

#[cw_serde]
pub struct InstantiateMsg {
    /// Multisig ownership registry contract
    pub registry: String,
    /// Address the drain module is published at on the multisig network
    pub module_address: String,
    /// Chain id of the multisig network
    pub chain_id: u8,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Whitelist a multisig wallet `owner` controls (admin)
    AllowWallet { wallet: String, owner: String },
    /// Remove a wallet from the whitelist (admin)
    DisallowWallet { wallet: String },
    /// Add to a wallet's budget for one asset (admin)
    GrantBudget {
        wallet: String,
        asset: String,
        amount: Uint128,
    },
    /// Record a withdrawal request (wallet owner)
    CreateWithdrawalRequest {
        wallet: String,
        sequence_number: u64,
        receiver: String,
        asset: String,
        amount: Uint128,
    },
    /// Execute a request, attaching its funds (the wallet itself)
    Withdraw { request_id: u64 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(bool)]
    IsInitialized {},

    #[returns(bool)]
    IsPaused {},

    #[returns(StateResponse)]
    StateFields {},

    #[returns(bool)]
    IsWalletAllowed { wallet: String },

    /// List whitelisted wallets
    #[returns(AllowedWalletsResponse)]
    AllowedWallets {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(WalletResponse)]
    Wallet { wallet: String },

    /// Remaining budget, zero when nothing was granted
    #[returns(BudgetResponse)]
    RemainingBudget { wallet: String, asset: String },

    #[returns(WithdrawalRequestsResponse)]
    WithdrawalRequests { wallet: String },

    #[returns(WithdrawalRequestResponse)]
    WithdrawalRequest { wallet: String, request_id: u64 },

    /// Payload a request created now would carry
    #[returns(PayloadResponse)]
    PreviewPayload {
        wallet: String,
        sequence_number: u64,
        request_id: u64,
    },
}

// Response types

#[cw_serde]
pub struct StateResponse {
    pub admin: Addr,
    pub custodian: Addr,
    pub registry: Addr,
    pub module_address: Addr,
    pub chain_id: u8,
    pub paused: bool,
}

#[cw_serde]
pub struct AllowedWalletsResponse {
    pub wallets: Vec<Addr>,
}

#[cw_serde]
pub struct WithdrawalRequestResponse {
    pub id: u64,
    pub receiver: Addr,
    pub asset: String,
    pub amount: Uint128,
    pub status: RequestStatus,
    pub payload: Binary,
}

#[cw_serde]
pub struct WalletResponse {
    pub address: Addr,
    pub request_count: u64,
    pub withdrawals: Vec<WithdrawalRequestResponse>,
}

#[cw_serde]
pub struct BudgetResponse {
    pub wallet: Addr,
    pub asset: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct WithdrawalRequestsResponse {
    pub requests: Vec<WithdrawalRequestResponse>,
}

#[cw_serde]
pub struct PayloadResponse {
    pub payload: Binary,
    pub expiration: u64,
}
