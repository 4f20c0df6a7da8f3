//! Encoding utilities — base64 and hex.
//!
//! base64 (standard alphabet, with padding) carries the armor body; hex
//! carries keys at the CLI boundary. A base64 failure is always an armor
//! failure, so `from_base64` reports `ArmorError`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::SaltpackError;

/// Encode bytes to standard base64 (RFC 4648, with padding).
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64 to bytes.
///
/// # Errors
/// Returns `SaltpackError::ArmorError` on invalid base64 input.
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, SaltpackError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| SaltpackError::ArmorError(format!("invalid base64: {e}")))
}

/// Encode bytes to lowercase hex string.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode hex string to bytes.
///
/// # Errors
/// Returns `SaltpackError::Encoding` on odd-length or non-hex input.
pub fn from_hex(encoded: &str) -> Result<Vec<u8>, SaltpackError> {
    if encoded.len() % 2 != 0 {
        return Err(SaltpackError::Encoding("odd-length hex string".into()));
    }
    (0..encoded.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&encoded[i..i + 2], 16)
                .map_err(|e| SaltpackError::Encoding(format!("invalid hex: {e}")))
        })
        .collect()
}
