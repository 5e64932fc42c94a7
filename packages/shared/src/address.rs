use std::fmt;
use std::str::FromStr;

use cosmwasm_std::Addr;
use thiserror::Error;

/// Width of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

#[derive(Error, Debug, PartialEq)]
pub enum AddressError {
    #[error("Empty account address")]
    Empty {},

    #[error("Account address too long: {address}")]
    TooLong { address: String },

    #[error("Invalid hex in account address: {address}")]
    InvalidHex { address: String },
}

/// A 32-byte account address.
///
/// Displays as `0x` followed by 64 lowercase hex digits. Parsing also accepts the
/// short form (`0x1`) and input without the `0x` prefix; missing leading digits
/// are zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Host address holding the canonical string form, used as a storage key.
    pub fn to_addr(&self) -> Addr {
        Addr::unchecked(self.to_string())
    }
}

impl FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        if digits.is_empty() {
            return Err(AddressError::Empty {});
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AddressError::TooLong {
                address: input.to_string(),
            });
        }

        let padded = format!("{:0>width$}", digits, width = ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|_| AddressError::InvalidHex {
            address: input.to_string(),
        })?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}
