//! Conformance: encryption round-trips, header binding, packet order,
//! truncation, recipient isolation.

use saltpack_core::constants::CHUNK_SIZE;
use saltpack_core::{decrypt, encrypt, EncryptionKeyPair, SaltpackError};

use crate::util::{patterned, swap_values, wire_ranges};

#[test]
fn hello_round_trip_recovers_sender() {
    let alice = EncryptionKeyPair::generate();
    let bob = EncryptionKeyPair::generate();

    let wire = encrypt(b"Hello, Saltpack!", Some(&alice), &[bob.public_key]).unwrap();
    let opened = decrypt(&wire, &bob).unwrap();

    assert_eq!(opened.plaintext, b"Hello, Saltpack!");
    assert_eq!(opened.sender, Some(alice.public_key));
}

#[test]
fn anonymous_empty_message_round_trip() {
    let recipient = EncryptionKeyPair::generate();

    let wire = encrypt(b"", None, &[recipient.public_key]).unwrap();
    let opened = decrypt(&wire, &recipient).unwrap();

    assert!(opened.plaintext.is_empty());
    assert_eq!(opened.sender, None);
}

#[test]
fn three_recipients_two_full_chunks() {
    let sender = EncryptionKeyPair::generate();
    let x = EncryptionKeyPair::generate();
    let y = EncryptionKeyPair::generate();
    let z = EncryptionKeyPair::generate();
    let plaintext = patterned(2 * CHUNK_SIZE);

    let wire = encrypt(
        &plaintext,
        Some(&sender),
        &[x.public_key, y.public_key, z.public_key],
    )
    .unwrap();

    // Header, two data packets, one terminator.
    assert_eq!(wire_ranges(&wire).len(), 4);

    for recipient in [&x, &y, &z] {
        let opened = decrypt(&wire, recipient).unwrap();
        assert_eq!(opened.plaintext, plaintext);
        assert_eq!(opened.sender, Some(sender.public_key));
    }
}

#[test]
fn chunk_size_boundaries_round_trip() {
    let recipient = EncryptionKeyPair::generate();
    let sizes = [
        0,
        1,
        CHUNK_SIZE - 1,
        CHUNK_SIZE,
        CHUNK_SIZE + 1,
        3 * CHUNK_SIZE,
    ];
    for size in sizes {
        let plaintext = patterned(size);
        let wire = encrypt(&plaintext, None, &[recipient.public_key]).unwrap();
        let opened = decrypt(&wire, &recipient).unwrap();
        assert_eq!(opened.plaintext, plaintext, "round trip failed at {size}");
    }
}

#[test]
fn non_recipient_never_sees_plaintext() {
    let sender = EncryptionKeyPair::generate();
    let recipients: Vec<EncryptionKeyPair> =
        (0..3).map(|_| EncryptionKeyPair::generate()).collect();
    let recipient_keys: Vec<[u8; 32]> = recipients.iter().map(|kp| kp.public_key).collect();
    let eve = EncryptionKeyPair::generate();

    let wire = encrypt(b"members only", Some(&sender), &recipient_keys).unwrap();

    let err = decrypt(&wire, &eve).unwrap_err();
    assert!(matches!(err, SaltpackError::NotARecipient));
}

#[test]
fn header_bit_flips_never_yield_forged_plaintext() {
    let sender = EncryptionKeyPair::generate();
    let recipient = EncryptionKeyPair::generate();
    let plaintext = b"bind me to the header";
    let wire = encrypt(plaintext, Some(&sender), &[recipient.public_key]).unwrap();
    let header_range = wire_ranges(&wire)[0].clone();

    // Flipping a header bit must never produce different plaintext. The
    // only byte whose flip may still decrypt is the minor version (it is
    // not load-bearing); everything else fails before any chunk opens.
    let mut survivors = 0;
    for position in header_range {
        let mut tampered = wire.clone();
        tampered[position] ^= 0x01;
        match decrypt(&tampered, &recipient) {
            Err(_) => {}
            Ok(opened) => {
                survivors += 1;
                assert_eq!(opened.plaintext, plaintext);
            }
        }
    }
    assert!(survivors <= 1, "{survivors} header bytes were not binding");
}

#[test]
fn swapped_payload_packets_fail_authentication() {
    let recipient = EncryptionKeyPair::generate();
    let plaintext = patterned(2 * CHUNK_SIZE + 17);
    let wire = encrypt(&plaintext, None, &[recipient.public_key]).unwrap();

    // Values: header, data 0, data 1, data 2, terminator.
    assert_eq!(wire_ranges(&wire).len(), 5);
    let swapped = swap_values(&wire, 1, 2);

    let err = decrypt(&swapped, &recipient).unwrap_err();
    assert!(matches!(
        err,
        SaltpackError::AuthFailure { index: 0, .. }
    ));
}

#[test]
fn missing_terminator_is_unexpected_eof() {
    let alice = EncryptionKeyPair::generate();
    let bob = EncryptionKeyPair::generate();
    let wire = encrypt(b"Hello, Saltpack!", Some(&alice), &[bob.public_key]).unwrap();

    let terminator_start = wire_ranges(&wire).last().unwrap().start;
    let err = decrypt(&wire[..terminator_start], &bob).unwrap_err();
    assert!(matches!(err, SaltpackError::UnexpectedEof));
}

#[test]
fn truncation_mid_packet_is_unexpected_eof() {
    let recipient = EncryptionKeyPair::generate();
    let wire = encrypt(b"cut mid-packet", None, &[recipient.public_key]).unwrap();

    let err = decrypt(&wire[..wire.len() - 3], &recipient).unwrap_err();
    assert!(matches!(err, SaltpackError::UnexpectedEof));
}

#[test]
fn wire_is_not_plaintext() {
    let recipient = EncryptionKeyPair::generate();
    let plaintext = patterned(4096);
    let wire = encrypt(&plaintext, None, &[recipient.public_key]).unwrap();

    // The payload must not appear in the clear anywhere on the wire.
    let needle = &plaintext[..64];
    assert!(!wire.windows(64).any(|window| window == needle));
}
