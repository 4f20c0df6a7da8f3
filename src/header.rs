//! Header assembly and parsing.
//!
//! Both modes share the leading three elements (format name, version,
//! mode); the remainder is mode-specific. Builders return the canonical
//! encoded bytes — the same bytes that are hashed and that appear on the
//! wire. Parsers validate structure and lengths but perform no crypto;
//! unwrapping the payload key and checking signatures belongs to the
//! mode drivers.

use rmpv::Value;

use crate::constants::{
    FORMAT_NAME, HEADER_NONCE_LENGTH, MODE_ATTACHED_SIGNING, MODE_ENCRYPTION, PUBLIC_KEY_LENGTH,
    VERSION,
};
use crate::errors::SaltpackError;
use crate::pack;

/// Parsed encryption header (mode 0).
#[derive(Debug)]
pub struct EncryptionHeader {
    /// Message-scoped X25519 public key of the encryptor.
    pub ephemeral_public_key: [u8; PUBLIC_KEY_LENGTH],
    /// Secretbox of the sender's public key (or zeros) under the payload key.
    pub sender_secretbox: Vec<u8>,
    /// Recipient entries in wire order; order fixes the box nonce counter.
    pub recipients: Vec<RecipientEntry>,
}

/// One `[public_key_or_nil, payload_key_box]` pair from the header.
#[derive(Debug)]
pub struct RecipientEntry {
    /// Explicit recipient public key, or None for a hidden recipient.
    pub public_key: Option<[u8; PUBLIC_KEY_LENGTH]>,
    /// Box of the payload key, keyed ephemeral↔recipient.
    pub payload_key_box: Vec<u8>,
}

/// Parsed attached-signing header (mode 1).
#[derive(Debug)]
pub struct SigningHeader {
    /// The signer's Ed25519 public key as declared in the header.
    pub signer_public_key: [u8; PUBLIC_KEY_LENGTH],
    /// Random per-message nonce mixed into every signature input.
    pub header_nonce: [u8; HEADER_NONCE_LENGTH],
}

fn malformed(msg: impl Into<String>) -> SaltpackError {
    SaltpackError::MalformedHeader(msg.into())
}

fn version_value() -> Value {
    Value::Array(vec![Value::from(VERSION[0]), Value::from(VERSION[1])])
}

/// Encode the 6-element encryption header.
///
/// `recipients` pairs an optional explicit public key with the 48-byte
/// payload-key box, in the order that fixed the box nonce counters.
pub fn encode_encryption_header(
    ephemeral_public_key: &[u8; PUBLIC_KEY_LENGTH],
    sender_secretbox: Vec<u8>,
    recipients: Vec<(Option<[u8; PUBLIC_KEY_LENGTH]>, Vec<u8>)>,
) -> Result<Vec<u8>, SaltpackError> {
    let entries = recipients
        .into_iter()
        .map(|(public_key, payload_key_box)| {
            let key_slot = match public_key {
                Some(pk) => Value::Binary(pk.to_vec()),
                None => Value::Nil,
            };
            Value::Array(vec![key_slot, Value::Binary(payload_key_box)])
        })
        .collect();

    let header = Value::Array(vec![
        Value::from(FORMAT_NAME),
        version_value(),
        Value::from(MODE_ENCRYPTION),
        Value::Binary(ephemeral_public_key.to_vec()),
        Value::Binary(sender_secretbox),
        Value::Array(entries),
    ]);
    pack::encode_value(&header)
}

/// Encode the 5-element attached-signing header.
pub fn encode_signing_header(
    signer_public_key: &[u8; PUBLIC_KEY_LENGTH],
    header_nonce: &[u8; HEADER_NONCE_LENGTH],
) -> Result<Vec<u8>, SaltpackError> {
    let header = Value::Array(vec![
        Value::from(FORMAT_NAME),
        version_value(),
        Value::from(MODE_ATTACHED_SIGNING),
        Value::Binary(signer_public_key.to_vec()),
        Value::Binary(header_nonce.to_vec()),
    ]);
    pack::encode_value(&header)
}

/// Parse and validate an encryption header value.
pub fn parse_encryption_header(value: &Value) -> Result<EncryptionHeader, SaltpackError> {
    let elements = header_elements(value, 6, MODE_ENCRYPTION)?;

    let ephemeral_public_key = fixed_bytes::<PUBLIC_KEY_LENGTH>(&elements[3], "ephemeral public key")?;
    let sender_secretbox = pack::as_binary(&elements[4])
        .ok_or_else(|| malformed("sender secretbox is not a byte string"))?
        .to_vec();

    let entry_values = elements[5]
        .as_array()
        .ok_or_else(|| malformed("recipient list is not an array"))?;
    let mut recipients = Vec::with_capacity(entry_values.len());
    for entry in entry_values {
        let pair = entry
            .as_array()
            .ok_or_else(|| malformed("recipient entry is not an array"))?;
        if pair.len() != 2 {
            return Err(malformed("recipient entry is not a 2-element array"));
        }
        let public_key = if pair[0].is_nil() {
            None
        } else {
            Some(fixed_bytes::<PUBLIC_KEY_LENGTH>(&pair[0], "recipient public key")?)
        };
        let payload_key_box = pack::as_binary(&pair[1])
            .ok_or_else(|| malformed("payload key box is not a byte string"))?
            .to_vec();
        recipients.push(RecipientEntry {
            public_key,
            payload_key_box,
        });
    }

    Ok(EncryptionHeader {
        ephemeral_public_key,
        sender_secretbox,
        recipients,
    })
}

/// Parse and validate an attached-signing header value.
pub fn parse_signing_header(value: &Value) -> Result<SigningHeader, SaltpackError> {
    let elements = header_elements(value, 5, MODE_ATTACHED_SIGNING)?;

    Ok(SigningHeader {
        signer_public_key: fixed_bytes::<PUBLIC_KEY_LENGTH>(&elements[3], "signer public key")?,
        header_nonce: fixed_bytes::<HEADER_NONCE_LENGTH>(&elements[4], "header nonce")?,
    })
}

/// Validate the shared leading elements and the header arity.
fn header_elements(
    value: &Value,
    expected_len: usize,
    expected_mode: u64,
) -> Result<&[Value], SaltpackError> {
    let elements = value
        .as_array()
        .ok_or_else(|| malformed("header is not an array"))?;
    if elements.len() != expected_len {
        return Err(malformed(format!(
            "header has {} elements, expected {expected_len}",
            elements.len()
        )));
    }

    let format = elements[0]
        .as_str()
        .ok_or_else(|| malformed("format name is not a string"))?;
    if format != FORMAT_NAME {
        return Err(malformed(format!("unknown format name {format:?}")));
    }

    let version = elements[1]
        .as_array()
        .ok_or_else(|| malformed("version is not an array"))?;
    let major = version
        .first()
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("version major is not an integer"))?;
    if major != VERSION[0] {
        return Err(SaltpackError::UnsupportedVersion(major));
    }

    let mode = elements[2]
        .as_u64()
        .ok_or_else(|| malformed("mode is not an integer"))?;
    if mode != expected_mode {
        return Err(malformed(format!(
            "unexpected mode {mode}, expected {expected_mode}"
        )));
    }

    Ok(elements)
}

/// Decode a fixed-length byte string element.
fn fixed_bytes<const N: usize>(value: &Value, what: &str) -> Result<[u8; N], SaltpackError> {
    let bytes =
        pack::as_binary(value).ok_or_else(|| malformed(format!("{what} is not a byte string")))?;
    bytes
        .try_into()
        .map_err(|_| malformed(format!("{what} has length {}, expected {N}", bytes.len())))
}
