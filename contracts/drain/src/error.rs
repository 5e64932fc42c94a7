use cosmwasm_std::{OverflowError, StdError, Uint128};
use shared::AddressError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    Address(#[from] AddressError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Sender is not an owner of the multisig wallet")]
    NotWalletOwner {},

    #[error("Wallet already allowed")]
    WalletAlreadyAllowed {},

    #[error("Wallet not allowed")]
    WalletNotAllowed {},

    #[error("Allowed wallet not found")]
    AllowedWalletNotFound {},

    #[error("Asset not permitted for wallet")]
    AssetNotPermitted {},

    #[error("Amount {requested} exceeds remaining budget {remaining}")]
    BudgetExceeded {
        requested: Uint128,
        remaining: Uint128,
    },

    #[error("Amount must be greater than zero")]
    InvalidAmount {},

    #[error("Wallet not found")]
    WalletNotFound {},

    #[error("Invalid request id {request_id}")]
    InvalidRequestId { request_id: u64 },

    #[error("Request {request_id} already executed")]
    RequestAlreadyExecuted { request_id: u64 },

    #[error("Attached funds must be exactly {amount}{denom}")]
    FundsMismatch { amount: Uint128, denom: String },

    #[error("Receiver balance is {actual}, expected {expected}")]
    InvalidBalance { expected: Uint128, actual: Uint128 },

    #[error("No withdrawal in flight")]
    NoPendingWithdrawal {},

    #[error("Unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
