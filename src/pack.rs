//! Object-packing adapter.
//!
//! The wire is a stream of top-level values in a self-describing binary
//! object encoding (`rmpv`). The reader yields each value together with
//! the exact byte range it consumed: the header hash must be computed
//! over the bytes as they appeared on the wire, never over a re-encoding,
//! because canonical encoding is not guaranteed to round-trip across
//! implementations.

use std::io::Cursor;
use std::ops::Range;

use rmpv::decode::{self, Error as DecodeError};
use rmpv::encode;
use rmpv::Value;

use crate::errors::SaltpackError;

/// Canonically encode one value.
pub fn encode_value(value: &Value) -> Result<Vec<u8>, SaltpackError> {
    let mut buf = Vec::new();
    encode::write_value(&mut buf, value)
        .map_err(|e| SaltpackError::Encoding(format!("object packing failed: {e}")))?;
    Ok(buf)
}

/// Borrow the payload of a binary value.
pub fn as_binary(value: &Value) -> Option<&[u8]> {
    match value {
        Value::Binary(bytes) => Some(bytes),
        _ => None,
    }
}

/// Pull-style reader over a byte stream of packed values.
pub struct StreamReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> StreamReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        StreamReader { buf, pos: 0 }
    }

    /// True when the stream has no bytes left — a clean packet boundary.
    pub fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Decode the next top-level value, returning it with the byte range
    /// it occupied in the input.
    ///
    /// # Errors
    /// `UnexpectedEof` if the stream ends mid-value, `MalformedHeader` on
    /// any other decode failure. Callers detect a clean end-of-stream with
    /// [`StreamReader::at_end`] before calling.
    pub fn next_value(&mut self) -> Result<(Value, Range<usize>), SaltpackError> {
        let start = self.pos;
        let mut cursor = Cursor::new(&self.buf[start..]);
        let value = decode::read_value(&mut cursor).map_err(map_decode_error)?;
        self.pos = start + cursor.position() as usize;
        Ok((value, start..self.pos))
    }
}

fn map_decode_error(err: DecodeError) -> SaltpackError {
    let eof = match &err {
        DecodeError::InvalidMarkerRead(io) | DecodeError::InvalidDataRead(io) => {
            io.kind() == std::io::ErrorKind::UnexpectedEof
        }
        _ => false,
    };
    if eof {
        SaltpackError::UnexpectedEof
    } else {
        SaltpackError::MalformedHeader(format!("undecodable value: {err}"))
    }
}
