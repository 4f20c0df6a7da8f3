//! Protocol constants — canonical Saltpack v2 wire format values.
//!
//! Every value here is normative. Nonce prefixes are ASCII and used
//! bit-exact; counters are appended big-endian (see `nonce`).

/// Format name, the first element of every header.
pub const FORMAT_NAME: &str = "saltpack";

/// Protocol version emitted on the wire: major 2, minor 0.
pub const VERSION: [u64; 2] = [2, 0];

/// Header mode value for encryption messages.
pub const MODE_ENCRYPTION: u64 = 0;

/// Header mode value for attached-signing messages.
pub const MODE_ATTACHED_SIGNING: u64 = 1;

/// NaCl box/secretbox nonce length in bytes.
pub const NONCE_LENGTH: usize = 24;

/// X25519 / Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// X25519 secret key length in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Ed25519 secret key length in bytes (32-byte seed followed by the
/// 32-byte public key).
pub const SIGNING_SECRET_KEY_LENGTH: usize = 64;

/// Detached Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Single-use symmetric payload key length in bytes.
pub const PAYLOAD_KEY_LENGTH: usize = 32;

/// Signing header nonce length in bytes.
pub const HEADER_NONCE_LENGTH: usize = 32;

/// Header hash length in bytes (truncated BLAKE2b-512).
pub const HEADER_HASH_LENGTH: usize = 32;

/// NaCl box/secretbox overhead (Poly1305 MAC).
pub const BOX_OVERHEAD: usize = 16;

/// Maximum plaintext chunk length in bytes (1 MiB).
pub const CHUNK_SIZE: usize = 1_048_576;

/// Nonce prefix for recipient payload-key boxes (16 bytes).
pub const NONCE_PREFIX_RECIPIENT: &[u8; 16] = b"saltpack_recipsb";

/// Nonce prefix for payload chunk secretboxes (16 bytes).
pub const NONCE_PREFIX_PAYLOAD: &[u8; 16] = b"saltpack_ploadsb";

/// Fixed nonce for the sender-identity secretbox (24 bytes, no counter).
pub const SENDER_KEY_NONCE: &[u8; 24] = b"saltpack_sender_key_sbox";

/// Armor body line width in characters.
pub const ARMOR_LINE_WIDTH: usize = 43;
