//! Hashing — BLAKE2b-512 and the truncated header hash.
//!
//! The header hash is the first 32 bytes of BLAKE2b-512 over the canonical
//! header bytes exactly as they appear on the wire. Callers must hash the
//! byte slice that was emitted or consumed, never a re-encoding.

use blake2::{Blake2b512, Digest};

use crate::constants::HEADER_HASH_LENGTH;

/// Compute BLAKE2b-512 of arbitrary data (64-byte digest).
pub fn blake2b_512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Header hash: first 32 bytes of BLAKE2b-512 over the header bytes.
pub fn header_hash(header_bytes: &[u8]) -> [u8; HEADER_HASH_LENGTH] {
    let digest = blake2b_512(header_bytes);
    let mut out = [0u8; HEADER_HASH_LENGTH];
    out.copy_from_slice(&digest[..HEADER_HASH_LENGTH]);
    out
}
