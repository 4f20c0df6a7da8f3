//! Attached signing engine.
//!
//! The message travels with its signatures: one 2-element packet
//! `[signature, chunk]` per 1 MiB chunk, then a final packet with an
//! empty chunk and the final flag set in its signing input. Each
//! signature binds the header (via its hash), the per-message header
//! nonce, the packet index, and the final flag, so packets cannot be
//! reordered, dropped, or grafted onto another message.

use ed25519_dalek::{Signer, SigningKey};
use rand_core::{OsRng, RngCore};
use rmpv::Value;

use crate::constants::{CHUNK_SIZE, HEADER_HASH_LENGTH, HEADER_NONCE_LENGTH};
use crate::errors::SaltpackError;
use crate::hash;
use crate::header;
use crate::keys::SigningKeyPair;
use crate::pack;

/// Per-packet signing input: `header_hash || header_nonce || be64(index)
/// || final_flag || chunk`.
pub(crate) fn signature_input(
    header_hash: &[u8; HEADER_HASH_LENGTH],
    header_nonce: &[u8; HEADER_NONCE_LENGTH],
    index: u64,
    is_final: bool,
    chunk: &[u8],
) -> Vec<u8> {
    let mut input =
        Vec::with_capacity(HEADER_HASH_LENGTH + HEADER_NONCE_LENGTH + 8 + 1 + chunk.len());
    input.extend_from_slice(header_hash);
    input.extend_from_slice(header_nonce);
    input.extend_from_slice(&index.to_be_bytes());
    input.push(is_final as u8);
    input.extend_from_slice(chunk);
    input
}

/// Sign `message` with `signer`, producing the attached-signing wire
/// format: header, one packet per chunk, and the final empty packet.
pub fn sign(message: &[u8], signer: &SigningKeyPair) -> Result<Vec<u8>, SaltpackError> {
    let signing_key = SigningKey::from_keypair_bytes(&signer.secret_key).map_err(|_| {
        SaltpackError::InvalidArgument("signing secret key does not validate".into())
    })?;

    let mut header_nonce = [0u8; HEADER_NONCE_LENGTH];
    OsRng.fill_bytes(&mut header_nonce);

    let header_bytes = header::encode_signing_header(&signer.public_key, &header_nonce)?;
    let header_hash = hash::header_hash(&header_bytes);

    let mut out = header_bytes;
    for (index, (chunk, is_final)) in chunks_with_final(message).enumerate() {
        let input = signature_input(&header_hash, &header_nonce, index as u64, is_final, chunk);
        let signature = signing_key.sign(&input);
        let packet = Value::Array(vec![
            Value::Binary(signature.to_bytes().to_vec()),
            Value::Binary(chunk.to_vec()),
        ]);
        out.extend_from_slice(&pack::encode_value(&packet)?);
    }
    Ok(out)
}

/// Message chunks in wire order, then the final empty chunk.
fn chunks_with_final(message: &[u8]) -> impl Iterator<Item = (&[u8], bool)> {
    message
        .chunks(CHUNK_SIZE)
        .map(|chunk| (chunk, false))
        .chain(std::iter::once((&[][..], true)))
}
