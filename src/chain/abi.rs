//! Minimal ABI encoding for the static-argument calls the service makes.
//!
//! Only `address` and `uint256` words are needed: `decimals()` on the funding
//! token and `deployFundingVault(...)` on the factory. Values above `u128`
//! are rejected on decode.

use sha3::{Digest, Keccak256};

use super::ChainError;
use super::types::{Address, DeployVaultCall};

pub const DECIMALS_SIGNATURE: &str = "decimals()";
pub const DEPLOY_FUNDING_VAULT_SIGNATURE: &str = "deployFundingVault(address,address,uint256,uint256,uint256)";

const WORD: usize = 32;

/// First four bytes of the Keccak-256 digest of a function signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

#[must_use]
pub fn encode_address(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

#[must_use]
pub fn encode_uint(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Concatenate a selector and its argument words into calldata.
#[must_use]
pub fn encode_call(selector: [u8; 4], words: &[[u8; WORD]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + words.len() * WORD);
    data.extend_from_slice(&selector);
    for word in words {
        data.extend_from_slice(word);
    }
    data
}

#[must_use]
pub fn decimals_calldata() -> Vec<u8> {
    encode_call(selector(DECIMALS_SIGNATURE), &[])
}

#[must_use]
pub fn deploy_calldata(call: &DeployVaultCall) -> Vec<u8> {
    encode_call(
        selector(DEPLOY_FUNDING_VAULT_SIGNATURE),
        &[
            encode_address(&call.funding_token),
            encode_address(&call.voting_token),
            encode_uint(call.min_requestable_amount),
            encode_uint(call.max_requestable_amount),
            encode_uint(u128::from(call.tally_date)),
        ],
    )
}

fn first_word(data: &[u8]) -> Result<&[u8], ChainError> {
    data.get(..WORD)
        .ok_or_else(|| ChainError::Decode(format!("expected at least {WORD} bytes, got {}", data.len())))
}

/// Decode the first return word as an unsigned integer.
///
/// # Errors
///
/// Returns [`ChainError::Decode`] if the data is short or the value exceeds `u128`.
pub fn decode_uint(data: &[u8]) -> Result<u128, ChainError> {
    let word = first_word(data)?;
    if word[..16].iter().any(|b| *b != 0) {
        return Err(ChainError::Decode("uint256 value exceeds u128".into()));
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

/// Decode the first return word as an address.
///
/// # Errors
///
/// Returns [`ChainError::Decode`] if the data is short or the upper 12 bytes are dirty.
pub fn decode_address(data: &[u8]) -> Result<Address, ChainError> {
    let word = first_word(data)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(ChainError::Decode("address word has non-zero padding".into()));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address::from_bytes(bytes))
}

#[cfg(test)]
#[path = "abi_test.rs"]
mod tests;
