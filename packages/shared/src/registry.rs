// Query interface of the multisig ownership registry.

use cosmwasm_schema::{cw_serde, QueryResponses};

#[cw_serde]
#[derive(QueryResponses)]
pub enum RegistryQueryMsg {
    /// Wallets an owner controls, plus wallets still awaiting the owner's confirmation
    #[returns(OwnedWalletsResponse)]
    OwnedWallets { owner: String },
}

#[cw_serde]
pub struct OwnedWalletsResponse {
    /// Wallet creations the owner has not completed yet
    pub pending: Vec<String>,
    /// Wallets the owner is a confirmed owner of
    pub owned: Vec<String>,
}

impl OwnedWalletsResponse {
    /// Whether `wallet` is among the confirmed wallets. Pending ones never count.
    pub fn owns(&self, wallet: &crate::AccountAddress) -> bool {
        self.owned
            .iter()
            .filter_map(|w| w.parse::<crate::AccountAddress>().ok())
            .any(|w| &w == wallet)
    }
}
