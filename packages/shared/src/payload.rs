// Correlation payload for pending multisig withdrawals.
//
// The byte layout follows a BCS-encoded raw transaction calling
// `<module_address>::drain::withdraw(request_id)` from the multisig wallet, prefixed
// with the raw-transaction domain separator. Co-signers rebuild the same bytes to
// recognise the pending transaction they are asked to approve.
//
// The argument list is written as the bare u64 request id, without the outer
// vector count and per-argument length prefix of a full entry-function encoding.
// Consumers that expect the full framing will not match these bytes.

use sha3::{Digest, Sha3_256};

use crate::address::AccountAddress;

/// Salt hashed into the 32-byte domain separator.
pub const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";
/// Payload kind tag for an entry-function call (0 = script, 1 = module bundle).
pub const ENTRY_FUNCTION_PAYLOAD: u8 = 2;
pub const MODULE_NAME: &str = "drain";
pub const FUNCTION_NAME: &str = "withdraw";
pub const MAX_GAS_AMOUNT: u64 = 12_000;
pub const GAS_UNIT_PRICE: u64 = 120;
/// One week in seconds.
pub const EXPIRATION_HORIZON_SECS: u64 = 604_800;
/// Total length of an encoded withdraw payload.
pub const ENCODED_LENGTH: usize = 154;

/// SHA3-256 of [`RAW_TRANSACTION_SALT`].
pub fn domain_separator() -> [u8; 32] {
    let digest = Sha3_256::digest(RAW_TRANSACTION_SALT);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Append-only byte buffer with one method per canonical field encoding.
#[derive(Clone, Debug, Default)]
pub struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Raw 32-byte digest, no length prefix.
    pub fn write_digest(&mut self, digest: &[u8; 32]) -> &mut Self {
        self.buf.extend_from_slice(digest);
        self
    }

    /// Fixed-width 32-byte address, no length prefix.
    pub fn write_address(&mut self, address: &AccountAddress) -> &mut Self {
        self.buf.extend_from_slice(address.as_bytes());
        self
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Little-endian, 8 bytes.
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// ULEB128, as used for sequence lengths.
    pub fn write_uleb128(&mut self, mut value: u64) -> &mut Self {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return self;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Length-prefixed byte string.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_uleb128(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
        self
    }

    /// A sequence with no elements: its length prefix only.
    pub fn write_empty_sequence(&mut self) -> &mut Self {
        self.write_uleb128(0)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Inputs of one withdraw payload.
///
/// `expiration_timestamp_secs` and `chain_id` are ambient values sampled when the
/// request is created, so a payload can only be reproduced by a party that knows
/// both of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawPayload {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub module_address: AccountAddress,
    pub request_id: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

impl WithdrawPayload {
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = PayloadWriter::with_capacity(ENCODED_LENGTH);
        writer
            .write_digest(&domain_separator())
            .write_address(&self.sender)
            .write_u64(self.sequence_number)
            .write_u8(ENTRY_FUNCTION_PAYLOAD)
            .write_address(&self.module_address)
            .write_bytes(MODULE_NAME.as_bytes())
            .write_bytes(FUNCTION_NAME.as_bytes())
            // no type arguments
            .write_empty_sequence()
            .write_u64(self.request_id)
            .write_u64(MAX_GAS_AMOUNT)
            .write_u64(GAS_UNIT_PRICE)
            .write_u64(self.expiration_timestamp_secs)
            .write_u8(self.chain_id);
        writer.into_bytes()
    }
}
