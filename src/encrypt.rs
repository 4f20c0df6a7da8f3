//! Encryption writer — header assembly, recipient wrapping, payload
//! chunking.
//!
//! All message-scoped secrets (payload key, ephemeral keypair) are
//! generated here and dropped (zeroized) when the write completes. The
//! payload key reaches the wire only inside the recipient boxes and the
//! sender secretbox.

use crypto_box::{aead::Aead, Nonce as BoxNonce, PublicKey, SalsaBox, SecretKey};
use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::{Key as SecretboxKey, Nonce as SecretboxNonce, XSalsa20Poly1305};
use rmpv::Value;

use crate::constants::{CHUNK_SIZE, PUBLIC_KEY_LENGTH, SENDER_KEY_NONCE};
use crate::errors::SaltpackError;
use crate::header;
use crate::keys::{EncryptionKeyPair, PayloadKey};
use crate::nonce;
use crate::pack;

/// Encrypt `plaintext` from `sender` to every key in `recipients`.
///
/// `None` for the sender produces an anonymous message: the sender
/// secretbox carries 32 zero bytes. Recipient public keys are written
/// into the header explicitly; use [`encrypt_with_hidden_recipients`] to
/// write nil slots instead.
///
/// Returns the full binary message: header, one packet per chunk, and
/// the empty-chunk terminator.
pub fn encrypt(
    plaintext: &[u8],
    sender: Option<&EncryptionKeyPair>,
    recipients: &[[u8; PUBLIC_KEY_LENGTH]],
) -> Result<Vec<u8>, SaltpackError> {
    encrypt_impl(plaintext, sender, recipients, false)
}

/// Like [`encrypt`], but the header's recipient key slots are nil, so the
/// wire does not reveal who can read the message. Recipients must trial-
/// decrypt every entry.
pub fn encrypt_with_hidden_recipients(
    plaintext: &[u8],
    sender: Option<&EncryptionKeyPair>,
    recipients: &[[u8; PUBLIC_KEY_LENGTH]],
) -> Result<Vec<u8>, SaltpackError> {
    encrypt_impl(plaintext, sender, recipients, true)
}

fn encrypt_impl(
    plaintext: &[u8],
    sender: Option<&EncryptionKeyPair>,
    recipients: &[[u8; PUBLIC_KEY_LENGTH]],
    hide_recipients: bool,
) -> Result<Vec<u8>, SaltpackError> {
    if recipients.is_empty() {
        return Err(SaltpackError::InvalidArgument(
            "recipient list is empty".into(),
        ));
    }

    let payload_key = PayloadKey::generate();
    let ephemeral = EncryptionKeyPair::generate();

    let mut message = encode_header(sender, recipients, &payload_key, &ephemeral, hide_recipients)?;

    let secretbox = XSalsa20Poly1305::new(SecretboxKey::from_slice(payload_key.as_bytes()));
    for (index, chunk) in payload_chunks(plaintext).enumerate() {
        let chunk_nonce = nonce::payload_nonce(index as u64);
        let ciphertext = secretbox
            .encrypt(SecretboxNonce::from_slice(&chunk_nonce), chunk)
            .map_err(|_| SaltpackError::Encoding("payload secretbox failed".into()))?;
        let packet = Value::Array(vec![Value::Binary(ciphertext)]);
        message.extend_from_slice(&pack::encode_value(&packet)?);
    }

    Ok(message)
}

/// Wrap the payload key for every recipient, seal the sender identity,
/// and emit the canonical header bytes.
fn encode_header(
    sender: Option<&EncryptionKeyPair>,
    recipients: &[[u8; PUBLIC_KEY_LENGTH]],
    payload_key: &PayloadKey,
    ephemeral: &EncryptionKeyPair,
    hide_recipients: bool,
) -> Result<Vec<u8>, SaltpackError> {
    let ephemeral_sk = SecretKey::from(ephemeral.secret_key);

    let mut entries = Vec::with_capacity(recipients.len());
    for (index, recipient_pk) in recipients.iter().enumerate() {
        let recipient_box = SalsaBox::new(&PublicKey::from(*recipient_pk), &ephemeral_sk);
        let box_nonce = nonce::recipient_box_nonce(index as u64);
        let payload_key_box = recipient_box
            .encrypt(
                BoxNonce::from_slice(&box_nonce),
                payload_key.as_bytes().as_slice(),
            )
            .map_err(|_| SaltpackError::Encoding("recipient box failed".into()))?;
        let key_slot = if hide_recipients {
            None
        } else {
            Some(*recipient_pk)
        };
        entries.push((key_slot, payload_key_box));
    }

    // 32 zero bytes mark an anonymous sender.
    let sender_pk = match sender {
        Some(keypair) => keypair.public_key,
        None => [0u8; PUBLIC_KEY_LENGTH],
    };
    let secretbox = XSalsa20Poly1305::new(SecretboxKey::from_slice(payload_key.as_bytes()));
    let sender_secretbox = secretbox
        .encrypt(
            SecretboxNonce::from_slice(SENDER_KEY_NONCE),
            sender_pk.as_slice(),
        )
        .map_err(|_| SaltpackError::Encoding("sender secretbox failed".into()))?;

    header::encode_encryption_header(&ephemeral.public_key, sender_secretbox, entries)
}

/// Plaintext chunks in wire order, ending with the empty terminator chunk.
fn payload_chunks(plaintext: &[u8]) -> impl Iterator<Item = &[u8]> {
    plaintext.chunks(CHUNK_SIZE).chain(std::iter::once(&[][..]))
}
