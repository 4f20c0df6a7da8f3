//! Error types for saltpack-core.
//!
//! One enum covers the whole protocol surface. Every error is fatal to the
//! current message: no partial plaintext is ever returned alongside an
//! error, and nothing retries.

/// Unified error type for all saltpack-core operations.
#[derive(Debug, thiserror::Error)]
pub enum SaltpackError {
    /// Structural decode failure, or wrong format name / mode.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Header declared a major version other than 2.
    #[error("unsupported version: major {0}")]
    UnsupportedVersion(u64),

    /// No recipient entry decrypts for the provided key.
    #[error("not a recipient of this message")]
    NotARecipient,

    /// A box open, secretbox open, or signature verification failed.
    #[error("authentication failure at packet {index} ({site})")]
    AuthFailure {
        /// Index of the failing packet.
        index: u64,
        /// The operation that failed ("payload secretbox",
        /// "sender secretbox", "signature").
        site: &'static str,
    },

    /// Stream ended before the terminator packet.
    #[error("unexpected end of stream before terminator packet")]
    UnexpectedEof,

    /// Verification key does not match the header-declared signer.
    #[error("message was signed by a different key")]
    WrongSigner,

    /// Malformed ASCII wrapper or invalid base64 body.
    #[error("armor error: {0}")]
    ArmorError(String),

    /// Caller-supplied argument is unusable (empty recipient list, bad
    /// secret key, wrong key length).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Encoding failure (object packing, hex).
    #[error("encoding error: {0}")]
    Encoding(String),
}
