// Shared types for the multisig drain contract and its off-chain co-signers.
//
// Everything here is pure: the payload encoder must give byte-identical output
// whether it runs inside the contract or in a signer's tooling.

pub mod address;
pub mod payload;
pub mod registry;

pub use address::{AccountAddress, AddressError};
pub use payload::{PayloadWriter, WithdrawPayload};
pub use registry::{OwnedWalletsResponse, RegistryQueryMsg};
