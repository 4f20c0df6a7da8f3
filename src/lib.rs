//! Saltpack v2 message format — multi-recipient streaming encryption and
//! attached signing over NaCl primitives.
//!
//! A message is a stream of packed values: a mode-specific header, one
//! packet per 1 MiB chunk, and an empty-chunk terminator. Encryption
//! wraps a single-use payload key for every recipient with X25519 boxes
//! and secretboxes each chunk under a counter nonce; attached signing
//! carries a detached Ed25519 signature next to every chunk, bound to
//! the header via its BLAKE2b hash. The optional ASCII armor wraps the
//! binary stream in `BEGIN/END SALTPACK … MESSAGE.` lines with a base64
//! body.
//!
//! ```
//! use saltpack_core::{decrypt, encrypt, EncryptionKeyPair};
//!
//! let sender = EncryptionKeyPair::generate();
//! let recipient = EncryptionKeyPair::generate();
//!
//! let wire = encrypt(b"Hello, Saltpack!", Some(&sender), &[recipient.public_key]).unwrap();
//! let opened = decrypt(&wire, &recipient).unwrap();
//!
//! assert_eq!(opened.plaintext, b"Hello, Saltpack!");
//! assert_eq!(opened.sender, Some(sender.public_key));
//! ```

pub mod armor;
pub mod constants;
pub mod decrypt;
pub mod encoding;
pub mod encrypt;
pub mod errors;
pub mod hash;
pub mod header;
pub mod keys;
pub mod nonce;
pub mod pack;
pub mod sign;
pub mod verify;

pub use armor::{armor, dearmor, ArmorKind};
pub use decrypt::{decrypt, DecryptedMessage};
pub use encrypt::{encrypt, encrypt_with_hidden_recipients};
pub use errors::SaltpackError;
pub use keys::{EncryptionKeyPair, SigningKeyPair};
pub use sign::sign;
pub use verify::verify;

/// Encrypt and wrap the result in ENCRYPTED armor.
pub fn encrypt_armored(
    plaintext: &[u8],
    sender: Option<&EncryptionKeyPair>,
    recipients: &[[u8; 32]],
) -> Result<String, SaltpackError> {
    let message = encrypt(plaintext, sender, recipients)?;
    Ok(armor(&message, ArmorKind::Encrypted))
}

/// Strip armor and decrypt.
pub fn decrypt_armored(
    text: &str,
    recipient: &EncryptionKeyPair,
) -> Result<DecryptedMessage, SaltpackError> {
    decrypt(&dearmor(text)?, recipient)
}

/// Sign and wrap the result in SIGNED armor.
pub fn sign_armored(message: &[u8], signer: &SigningKeyPair) -> Result<String, SaltpackError> {
    let signed = sign(message, signer)?;
    Ok(armor(&signed, ArmorKind::Signed))
}

/// Strip armor and verify.
pub fn verify_armored(
    text: &str,
    expected_signer: &[u8; 32],
) -> Result<Vec<u8>, SaltpackError> {
    verify(&dearmor(text)?, expected_signer)
}
