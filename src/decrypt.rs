//! Decryption state machine.
//!
//! AwaitHeader → AwaitPayloadKey → AwaitChunks → Done. Every failure is
//! fatal to the message; no partial plaintext is returned. A message
//! only succeeds after the empty-chunk terminator has been observed and
//! authenticated — a stream that simply ends is a truncation attack,
//! not a short message.

use crypto_box::{aead::Aead, Nonce as BoxNonce, PublicKey, SalsaBox, SecretKey};
use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::{Key as SecretboxKey, Nonce as SecretboxNonce, XSalsa20Poly1305};
use rmpv::Value;

use crate::constants::{PAYLOAD_KEY_LENGTH, PUBLIC_KEY_LENGTH, SENDER_KEY_NONCE};
use crate::errors::SaltpackError;
use crate::header::{self, EncryptionHeader};
use crate::keys::{EncryptionKeyPair, PayloadKey};
use crate::nonce;
use crate::pack::{self, StreamReader};

/// Result of decrypting a message.
#[derive(Debug)]
pub struct DecryptedMessage {
    /// The reassembled plaintext.
    pub plaintext: Vec<u8>,
    /// The sender's encryption public key, or None for an anonymous
    /// sender.
    pub sender: Option<[u8; PUBLIC_KEY_LENGTH]>,
}

/// Decrypt a binary message for `recipient`.
///
/// # Errors
/// `NotARecipient` if no recipient entry unwraps with this keypair,
/// `AuthFailure` when a packet fails authentication, `UnexpectedEof`
/// when the stream ends before the terminator packet.
pub fn decrypt(
    message: &[u8],
    recipient: &EncryptionKeyPair,
) -> Result<DecryptedMessage, SaltpackError> {
    let mut reader = StreamReader::new(message);

    // AwaitHeader
    if reader.at_end() {
        return Err(SaltpackError::UnexpectedEof);
    }
    let (header_value, _header_range) = reader.next_value()?;
    let header = header::parse_encryption_header(&header_value)?;

    // AwaitPayloadKey
    let payload_key = unwrap_payload_key(&header, recipient)?;
    let secretbox = XSalsa20Poly1305::new(SecretboxKey::from_slice(payload_key.as_bytes()));
    let sender = unseal_sender(&secretbox, &header.sender_secretbox)?;

    // AwaitChunks
    let mut plaintext = Vec::new();
    let mut index: u64 = 0;
    loop {
        if reader.at_end() {
            return Err(SaltpackError::UnexpectedEof);
        }
        let (packet, _) = reader.next_value()?;
        let ciphertext = parse_payload_packet(&packet)?;
        let chunk_nonce = nonce::payload_nonce(index);
        let chunk = secretbox
            .decrypt(SecretboxNonce::from_slice(&chunk_nonce), ciphertext)
            .map_err(|_| SaltpackError::AuthFailure {
                index,
                site: "payload secretbox",
            })?;
        if chunk.is_empty() {
            // Terminator observed. Anything after it is not ours to read.
            return Ok(DecryptedMessage { plaintext, sender });
        }
        plaintext.extend_from_slice(&chunk);
        index += 1;
    }
}

/// Scan the recipient list for an entry this keypair can open.
///
/// Explicit entries are tried only when the public key matches; nil
/// entries are always trial-decrypted. Recipient order fixes the box
/// nonce counter.
fn unwrap_payload_key(
    header: &EncryptionHeader,
    recipient: &EncryptionKeyPair,
) -> Result<PayloadKey, SaltpackError> {
    let recipient_sk = SecretKey::from(recipient.secret_key);
    let ephemeral_box = SalsaBox::new(
        &PublicKey::from(header.ephemeral_public_key),
        &recipient_sk,
    );

    for (index, entry) in header.recipients.iter().enumerate() {
        let ours = match entry.public_key {
            Some(pk) => pk == recipient.public_key,
            None => true,
        };
        if !ours {
            continue;
        }
        let box_nonce = nonce::recipient_box_nonce(index as u64);
        let Ok(opened) = ephemeral_box.decrypt(
            BoxNonce::from_slice(&box_nonce),
            entry.payload_key_box.as_slice(),
        ) else {
            continue;
        };
        let bytes: [u8; PAYLOAD_KEY_LENGTH] = opened.try_into().map_err(|_| {
            SaltpackError::MalformedHeader("payload key has the wrong length".into())
        })?;
        return Ok(PayloadKey::from_bytes(bytes));
    }

    Err(SaltpackError::NotARecipient)
}

/// Open the sender secretbox; 32 zero bytes mark an anonymous sender.
fn unseal_sender(
    secretbox: &XSalsa20Poly1305,
    sender_secretbox: &[u8],
) -> Result<Option<[u8; PUBLIC_KEY_LENGTH]>, SaltpackError> {
    let opened = secretbox
        .decrypt(SecretboxNonce::from_slice(SENDER_KEY_NONCE), sender_secretbox)
        .map_err(|_| SaltpackError::AuthFailure {
            index: 0,
            site: "sender secretbox",
        })?;
    let sender_pk: [u8; PUBLIC_KEY_LENGTH] = opened
        .try_into()
        .map_err(|_| SaltpackError::MalformedHeader("sender key has the wrong length".into()))?;
    if sender_pk == [0u8; PUBLIC_KEY_LENGTH] {
        Ok(None)
    } else {
        Ok(Some(sender_pk))
    }
}

fn parse_payload_packet(packet: &Value) -> Result<&[u8], SaltpackError> {
    let elements = packet
        .as_array()
        .ok_or_else(|| SaltpackError::MalformedHeader("payload packet is not an array".into()))?;
    if elements.len() != 1 {
        return Err(SaltpackError::MalformedHeader(
            "payload packet is not a 1-element array".into(),
        ));
    }
    pack::as_binary(&elements[0])
        .ok_or_else(|| SaltpackError::MalformedHeader("ciphertext is not a byte string".into()))
}
