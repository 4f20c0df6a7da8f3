//! Nonce construction — deterministic 24-byte nonces.
//!
//! Layout: a fixed 16-byte ASCII prefix followed by a big-endian 64-bit
//! counter. Recipient boxes count recipients, payload secretboxes count
//! packets; both counters start at 0. The sender-identity secretbox uses
//! the fixed 24-byte `SENDER_KEY_NONCE` with no counter.

use crate::constants::{NONCE_LENGTH, NONCE_PREFIX_PAYLOAD, NONCE_PREFIX_RECIPIENT};

fn with_counter(prefix: &[u8; 16], counter: u64) -> [u8; NONCE_LENGTH] {
    let mut nonce = [0u8; NONCE_LENGTH];
    nonce[..16].copy_from_slice(prefix);
    nonce[16..].copy_from_slice(&counter.to_be_bytes());
    nonce
}

/// Nonce for the payload-key box of recipient `index`.
pub fn recipient_box_nonce(index: u64) -> [u8; NONCE_LENGTH] {
    with_counter(NONCE_PREFIX_RECIPIENT, index)
}

/// Nonce for the payload chunk secretbox of packet `index`.
pub fn payload_nonce(index: u64) -> [u8; NONCE_LENGTH] {
    with_counter(NONCE_PREFIX_PAYLOAD, index)
}
