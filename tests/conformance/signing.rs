//! Conformance: signing round-trips, signer binding, header binding,
//! packet order, truncation.

use saltpack_core::constants::CHUNK_SIZE;
use saltpack_core::{sign, verify, SaltpackError, SigningKeyPair};

use crate::util::{patterned, swap_values, wire_ranges};

#[test]
fn important_message_round_trip() {
    let signer = SigningKeyPair::generate();

    let signed = sign(b"Important message", &signer).unwrap();
    let recovered = verify(&signed, &signer.public_key).unwrap();

    assert_eq!(recovered, b"Important message");
}

#[test]
fn chunk_size_boundaries_round_trip() {
    let signer = SigningKeyPair::generate();
    let sizes = [
        0,
        1,
        CHUNK_SIZE - 1,
        CHUNK_SIZE,
        CHUNK_SIZE + 1,
        3 * CHUNK_SIZE,
    ];
    for size in sizes {
        let message = patterned(size);
        let signed = sign(&message, &signer).unwrap();
        let recovered = verify(&signed, &signer.public_key).unwrap();
        assert_eq!(recovered, message, "round trip failed at {size}");
    }
}

#[test]
fn flipped_signature_byte_is_auth_failure_at_packet_zero() {
    let signer = SigningKeyPair::generate();
    let signed = sign(b"Important message", &signer).unwrap();

    // First data packet: fixarray, bin marker and length, then the
    // 64-byte signature. Flip a byte in the middle of the signature.
    let packet_range = wire_ranges(&signed)[1].clone();
    let mut tampered = signed.clone();
    tampered[packet_range.start + 20] ^= 0x01;

    let err = verify(&tampered, &signer.public_key).unwrap_err();
    match err {
        SaltpackError::AuthFailure { index, site } => {
            assert_eq!(index, 0);
            assert_eq!(site, "signature");
        }
        other => panic!("expected AuthFailure, got {other:?}"),
    }
}

#[test]
fn wrong_verify_key_fails_before_chunk_auth() {
    let signer = SigningKeyPair::generate();
    let other = SigningKeyPair::generate();
    let mut signed = sign(b"whose words are these", &signer).unwrap();

    // Even with a corrupted first-packet signature, the signer check wins.
    let packet_start = wire_ranges(&signed)[1].start;
    signed[packet_start + 20] ^= 0xFF;

    let err = verify(&signed, &other.public_key).unwrap_err();
    assert!(matches!(err, SaltpackError::WrongSigner));
}

#[test]
fn every_header_bit_is_binding() {
    let signer = SigningKeyPair::generate();
    let signed = sign(b"bind the signing header", &signer).unwrap();
    let header_range = wire_ranges(&signed)[0].clone();

    // The header hash is in every signature input, so even bytes the
    // parser tolerates (the minor version) invalidate the signatures.
    for position in header_range {
        let mut tampered = signed.clone();
        tampered[position] ^= 0x01;
        assert!(
            verify(&tampered, &signer.public_key).is_err(),
            "header byte {position} was not binding"
        );
    }
}

#[test]
fn swapped_packets_fail_authentication() {
    let signer = SigningKeyPair::generate();
    let message = patterned(2 * CHUNK_SIZE + 9);
    let signed = sign(&message, &signer).unwrap();

    // Values: header, data 0, data 1, data 2, final.
    assert_eq!(wire_ranges(&signed).len(), 5);
    let swapped = swap_values(&signed, 1, 2);

    let err = verify(&swapped, &signer.public_key).unwrap_err();
    assert!(matches!(
        err,
        SaltpackError::AuthFailure { index: 0, .. }
    ));
}

#[test]
fn missing_final_packet_is_unexpected_eof() {
    let signer = SigningKeyPair::generate();
    let signed = sign(b"no final packet", &signer).unwrap();

    let final_start = wire_ranges(&signed).last().unwrap().start;
    let err = verify(&signed[..final_start], &signer.public_key).unwrap_err();
    assert!(matches!(err, SaltpackError::UnexpectedEof));
}

#[test]
fn relocated_final_packet_cannot_hide_data() {
    let signer = SigningKeyPair::generate();
    let message = patterned(CHUNK_SIZE + 100);
    let signed = sign(&message, &signer).unwrap();

    // Move the real final packet in front of the last data packet. Its
    // index changes, so its signature no longer verifies.
    let truncating = swap_values(&signed, 2, 3);
    let err = verify(&truncating, &signer.public_key).unwrap_err();
    assert!(matches!(err, SaltpackError::AuthFailure { .. }));
}
