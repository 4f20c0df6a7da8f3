//! Conformance: armor format and armored end-to-end flows.

use saltpack_core::{
    armor, dearmor, decrypt_armored, encrypt_armored, sign_armored, verify_armored, ArmorKind,
    EncryptionKeyPair, SigningKeyPair,
};

use crate::util::patterned;

#[test]
fn five_byte_payload_armor_round_trip() {
    let payload = [1u8, 2, 3, 4, 5];
    let armored = armor(&payload, ArmorKind::Encrypted);

    assert!(armored.starts_with("BEGIN SALTPACK ENCRYPTED MESSAGE."));
    assert!(armored.ends_with("END SALTPACK ENCRYPTED MESSAGE."));
    assert_eq!(dearmor(&armored).unwrap(), payload);
}

#[test]
fn armor_round_trips_both_kinds() {
    for kind in [ArmorKind::Encrypted, ArmorKind::Signed] {
        for size in [1, 42, 43, 44, 1000, 4096] {
            let payload = patterned(size);
            let armored = armor(&payload, kind);
            assert_eq!(
                dearmor(&armored).unwrap(),
                payload,
                "armor round trip failed for {kind:?} at {size}"
            );
        }
    }
}

#[test]
fn armored_encryption_end_to_end() {
    let sender = EncryptionKeyPair::generate();
    let recipient = EncryptionKeyPair::generate();

    let armored =
        encrypt_armored(b"over the text channel", Some(&sender), &[recipient.public_key]).unwrap();
    assert!(armored.is_ascii());

    let opened = decrypt_armored(&armored, &recipient).unwrap();
    assert_eq!(opened.plaintext, b"over the text channel");
    assert_eq!(opened.sender, Some(sender.public_key));
}

#[test]
fn armored_signing_end_to_end() {
    let signer = SigningKeyPair::generate();

    let armored = sign_armored(b"posted in the clear, signed", &signer).unwrap();
    assert!(armored.is_ascii());

    let recovered = verify_armored(&armored, &signer.public_key).unwrap();
    assert_eq!(recovered, b"posted in the clear, signed");
}

#[test]
fn armored_message_survives_reflow() {
    // Armor must survive the whitespace mangling of mail clients and
    // chat apps: leading/trailing blank lines and CRLF conversion.
    let recipient = EncryptionKeyPair::generate();
    let armored = encrypt_armored(b"mangled in transit", None, &[recipient.public_key]).unwrap();

    let mangled = format!("\r\n  {}\r\n", armored.replace('\n', "\r\n"));
    let opened = decrypt_armored(&mangled, &recipient).unwrap();
    assert_eq!(opened.plaintext, b"mangled in transit");
}

#[test]
fn dearmor_refuses_unwrapped_base64() {
    let err = dearmor("SGVsbG8sIFNhbHRwYWNrIQ==").unwrap_err();
    assert!(matches!(
        err,
        saltpack_core::SaltpackError::ArmorError(_)
    ));
}
