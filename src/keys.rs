//! Key material — X25519 encryption keypairs, Ed25519 signing keypairs,
//! and the single-use payload key.
//!
//! Every secret here is zeroized on drop via volatile writes, so
//! message-scoped keys (payload key, ephemeral keypair) are released on
//! all exit paths. Public keys supplied by callers are plain byte arrays
//! and are never mutated.

use crypto_box::SecretKey;
use ed25519_dalek::SigningKey;
use rand_core::{OsRng, RngCore};

use crate::constants::{PAYLOAD_KEY_LENGTH, SECRET_KEY_LENGTH};
use crate::errors::SaltpackError;

/// Overwrite a secret buffer with zeros.
///
/// Volatile writes prevent the compiler from optimizing away the
/// zeroization.
fn zeroize_bytes(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        unsafe { std::ptr::write_volatile(byte as *mut u8, 0u8) };
    }
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
}

/// X25519 keypair (long-lived identity or message-scoped ephemeral).
///
/// 32-byte public key (Curve25519 point) and 32-byte secret key. The
/// secret key is deterministically zeroized on drop.
#[derive(Clone)]
pub struct EncryptionKeyPair {
    /// Curve25519 public key (32 bytes).
    pub public_key: [u8; 32],
    /// Curve25519 secret key (32 bytes).
    pub secret_key: [u8; 32],
}

impl Drop for EncryptionKeyPair {
    fn drop(&mut self) {
        zeroize_bytes(&mut self.secret_key);
    }
}

impl EncryptionKeyPair {
    /// Generate a fresh X25519 keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut secret_bytes = [0u8; SECRET_KEY_LENGTH];
        OsRng.fill_bytes(&mut secret_bytes);
        Self::from_secret_key(secret_bytes)
    }

    /// Derive the public half and assemble a keypair from a raw secret key.
    pub fn from_secret_key(secret_key: [u8; 32]) -> Self {
        let sk = SecretKey::from(secret_key);
        let pk = sk.public_key();
        EncryptionKeyPair {
            public_key: *pk.as_bytes(),
            secret_key,
        }
    }
}

/// Ed25519 signing keypair.
///
/// The secret key is the 64-byte keypair form: the 32-byte seed followed
/// by the 32-byte public key. Zeroized on drop.
#[derive(Clone)]
pub struct SigningKeyPair {
    /// Ed25519 public key (32 bytes).
    pub public_key: [u8; 32],
    /// Ed25519 secret key (64 bytes, seed followed by public key).
    pub secret_key: [u8; 64],
}

impl Drop for SigningKeyPair {
    fn drop(&mut self) {
        zeroize_bytes(&mut self.secret_key);
    }
}

impl SigningKeyPair {
    /// Generate a fresh Ed25519 keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        let signing = SigningKey::generate(&mut OsRng);
        SigningKeyPair {
            public_key: signing.verifying_key().to_bytes(),
            secret_key: signing.to_keypair_bytes(),
        }
    }

    /// Validate a 64-byte secret key and recover the public half.
    ///
    /// # Errors
    /// Returns `SaltpackError::InvalidArgument` if the embedded public key
    /// does not match the seed.
    pub fn from_secret_key(secret_key: [u8; 64]) -> Result<Self, SaltpackError> {
        let signing = SigningKey::from_keypair_bytes(&secret_key).map_err(|_| {
            SaltpackError::InvalidArgument("signing secret key does not validate".into())
        })?;
        Ok(SigningKeyPair {
            public_key: signing.verifying_key().to_bytes(),
            secret_key,
        })
    }
}

/// Single-use symmetric key that encrypts every payload chunk of one
/// encryption message.
///
/// The payload key never appears on the wire outside the header's
/// recipient boxes and sender secretbox. Zeroized on drop.
pub(crate) struct PayloadKey([u8; PAYLOAD_KEY_LENGTH]);

impl Drop for PayloadKey {
    fn drop(&mut self) {
        zeroize_bytes(&mut self.0);
    }
}

impl PayloadKey {
    pub(crate) fn generate() -> Self {
        let mut bytes = [0u8; PAYLOAD_KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        PayloadKey(bytes)
    }

    pub(crate) fn from_bytes(bytes: [u8; PAYLOAD_KEY_LENGTH]) -> Self {
        PayloadKey(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; PAYLOAD_KEY_LENGTH] {
        &self.0
    }
}
