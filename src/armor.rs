//! ASCII armor — the ENCRYPTED/SIGNED text wrapper.
//!
//! Three LF-joined sections: a `BEGIN SALTPACK <TYPE> MESSAGE.` line, the
//! base64 body split into 43-character lines, and the matching `END` line.
//! Decoding is tolerant of surrounding whitespace and CRLF line endings.

use crate::constants::ARMOR_LINE_WIDTH;
use crate::encoding::{from_base64, to_base64};
use crate::errors::SaltpackError;

/// Message type named in the armor header and footer lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorKind {
    Encrypted,
    Signed,
}

impl ArmorKind {
    fn label(self) -> &'static str {
        match self {
            ArmorKind::Encrypted => "ENCRYPTED",
            ArmorKind::Signed => "SIGNED",
        }
    }
}

/// Wrap a binary payload in ASCII armor.
pub fn armor(payload: &[u8], kind: ArmorKind) -> String {
    let body = to_base64(payload);
    let mut out = String::with_capacity(body.len() + body.len() / ARMOR_LINE_WIDTH + 80);
    out.push_str("BEGIN SALTPACK ");
    out.push_str(kind.label());
    out.push_str(" MESSAGE.");
    // base64 is pure ASCII, so slicing at byte offsets is safe.
    let mut index = 0;
    while index < body.len() {
        let end = usize::min(index + ARMOR_LINE_WIDTH, body.len());
        out.push('\n');
        out.push_str(&body[index..end]);
        index = end;
    }
    out.push_str("\nEND SALTPACK ");
    out.push_str(kind.label());
    out.push_str(" MESSAGE.");
    out
}

/// Strip armor and return the binary payload.
///
/// # Errors
/// Returns `SaltpackError::ArmorError` on a malformed wrapper or invalid
/// base64 body.
pub fn dearmor(text: &str) -> Result<Vec<u8>, SaltpackError> {
    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < 3 {
        return Err(SaltpackError::ArmorError(
            "fewer than three non-empty lines".into(),
        ));
    }
    if !lines[0].starts_with("BEGIN SALTPACK") {
        return Err(SaltpackError::ArmorError(
            "missing BEGIN SALTPACK header line".into(),
        ));
    }
    if !lines[lines.len() - 1].starts_with("END SALTPACK") {
        return Err(SaltpackError::ArmorError(
            "missing END SALTPACK footer line".into(),
        ));
    }
    let body: String = lines[1..lines.len() - 1].concat();
    from_base64(&body)
}
