//! Shared wire-level helpers for the conformance tests.

use std::ops::Range;

use saltpack_core::pack::StreamReader;

/// Byte ranges of every top-level value on the wire, in order.
pub fn wire_ranges(message: &[u8]) -> Vec<Range<usize>> {
    let mut reader = StreamReader::new(message);
    let mut ranges = Vec::new();
    while !reader.at_end() {
        ranges.push(reader.next_value().expect("valid wire").1);
    }
    ranges
}

/// Deterministic patterned payload so mismatches show up anywhere.
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Rebuild a message with two of its wire values exchanged.
pub fn swap_values(message: &[u8], a: usize, b: usize) -> Vec<u8> {
    let ranges = wire_ranges(message);
    let mut out = Vec::with_capacity(message.len());
    for (index, range) in ranges.iter().enumerate() {
        let source = if index == a {
            &ranges[b]
        } else if index == b {
            &ranges[a]
        } else {
            range
        };
        out.extend_from_slice(&message[source.clone()]);
    }
    out
}
