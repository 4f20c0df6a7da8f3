//! Signature verification state machine.
//!
//! Mirrors the decryption driver over the shared framing: AwaitHeader
//! binds the expected signer before any chunk is touched, then each
//! packet's detached signature is checked against the reconstructed
//! signing input. Success requires the final packet; a stream that ends
//! without one is a truncation, not a short message.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::constants::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::errors::SaltpackError;
use crate::hash;
use crate::header;
use crate::pack::{self, StreamReader};
use crate::sign::signature_input;

/// Verify an attached-signing message against `expected_signer`.
///
/// Returns the reassembled message on success.
///
/// # Errors
/// `WrongSigner` if the header declares a different key (checked before
/// any chunk is authenticated), `AuthFailure` when a packet's signature
/// does not verify, `UnexpectedEof` when the stream ends before the
/// final packet.
pub fn verify(
    message: &[u8],
    expected_signer: &[u8; PUBLIC_KEY_LENGTH],
) -> Result<Vec<u8>, SaltpackError> {
    let mut reader = StreamReader::new(message);

    // AwaitHeader: hash the exact bytes the header occupied on the wire.
    if reader.at_end() {
        return Err(SaltpackError::UnexpectedEof);
    }
    let (header_value, header_range) = reader.next_value()?;
    let signing_header = header::parse_signing_header(&header_value)?;
    if &signing_header.signer_public_key != expected_signer {
        return Err(SaltpackError::WrongSigner);
    }
    let header_hash = hash::header_hash(&message[header_range]);

    let verifying_key = VerifyingKey::from_bytes(&signing_header.signer_public_key).map_err(
        |_| SaltpackError::MalformedHeader("signer public key is not a valid Ed25519 key".into()),
    )?;

    // AwaitChunks
    let mut out = Vec::new();
    let mut index: u64 = 0;
    loop {
        if reader.at_end() {
            return Err(SaltpackError::UnexpectedEof);
        }
        let (packet, _) = reader.next_value()?;
        let (signature_bytes, chunk) = parse_signing_packet(&packet)?;
        let is_final = chunk.is_empty();
        let input = signature_input(
            &header_hash,
            &signing_header.header_nonce,
            index,
            is_final,
            chunk,
        );
        let signature = Signature::from_bytes(&signature_bytes);
        verifying_key
            .verify(&input, &signature)
            .map_err(|_| SaltpackError::AuthFailure {
                index,
                site: "signature",
            })?;
        if is_final {
            return Ok(out);
        }
        out.extend_from_slice(chunk);
        index += 1;
    }
}

fn parse_signing_packet(
    packet: &rmpv::Value,
) -> Result<([u8; SIGNATURE_LENGTH], &[u8]), SaltpackError> {
    let elements = packet
        .as_array()
        .ok_or_else(|| SaltpackError::MalformedHeader("signing packet is not an array".into()))?;
    if elements.len() != 2 {
        return Err(SaltpackError::MalformedHeader(
            "signing packet is not a 2-element array".into(),
        ));
    }
    let signature_bytes = pack::as_binary(&elements[0])
        .ok_or_else(|| SaltpackError::MalformedHeader("signature is not a byte string".into()))?;
    let signature: [u8; SIGNATURE_LENGTH] = signature_bytes.try_into().map_err(|_| {
        SaltpackError::MalformedHeader(format!(
            "signature has length {}, expected {SIGNATURE_LENGTH}",
            signature_bytes.len()
        ))
    })?;
    let chunk = pack::as_binary(&elements[1])
        .ok_or_else(|| SaltpackError::MalformedHeader("chunk is not a byte string".into()))?;
    Ok((signature, chunk))
}
