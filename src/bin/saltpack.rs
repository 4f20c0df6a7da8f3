//! saltpack — command-line surface for the saltpack-core library.
//!
//! Messages travel stdin → stdout, whole. Keys are hex strings (with
//! optional `0x`, `pk_0x`, or `sk_0x` prefixes) passed with `-k` or taken
//! from the `SALTPACK_*` environment variables that `keygen` prints.
//! Exit code is 0 on success, 1 on any failure with a one-line error on
//! stderr.

use std::io::{self, Read, Write};

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use saltpack_core::encoding::{from_hex, to_hex};
use saltpack_core::errors::SaltpackError;
use saltpack_core::{
    armor, dearmor, decrypt, encrypt, sign, verify, ArmorKind, EncryptionKeyPair, SigningKeyPair,
};

#[derive(Parser)]
#[command(
    name = "saltpack",
    version,
    about = "Saltpack v2 encryption and attached signing"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an encryption keypair and a signing keypair
    Keygen {
        /// Emit a single JSON object instead of KEY=value lines
        #[arg(long)]
        json: bool,
    },

    /// Encrypt stdin to one or more recipients
    Encrypt {
        /// Recipient encryption public key (hex); repeatable
        #[arg(short = 'k', long = "key", env = "SALTPACK_ENCRYPT_PK")]
        keys: Vec<String>,
        /// Sender encryption secret key (hex); omit for an anonymous sender
        #[arg(long, env = "SALTPACK_DECRYPT_SK")]
        sender: Option<String>,
        /// Force an anonymous sender even when SALTPACK_DECRYPT_SK is set
        #[arg(long)]
        anonymous: bool,
        /// Armor the output (pass `-a false` for raw binary)
        #[arg(
            short = 'a',
            long,
            default_value_t = true,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        armor: bool,
    },

    /// Decrypt stdin with your encryption secret key
    Decrypt {
        /// Recipient encryption secret key (hex)
        #[arg(short = 'k', long = "key", env = "SALTPACK_DECRYPT_SK")]
        key: Option<String>,
        /// Expect armored input (pass `-a false` for raw binary)
        #[arg(
            short = 'a',
            long,
            default_value_t = true,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        armor: bool,
    },

    /// Sign stdin with your signing secret key
    Sign {
        /// Signing secret key (64-byte hex)
        #[arg(short = 'k', long = "key", env = "SALTPACK_SIGN_SK")]
        key: Option<String>,
        /// Armor the output (pass `-a false` for raw binary)
        #[arg(
            short = 'a',
            long,
            default_value_t = true,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        armor: bool,
    },

    /// Verify stdin against the signer's public key
    Verify {
        /// Expected signer public key (hex)
        #[arg(short = 'k', long = "key", env = "SALTPACK_VERIFY_PK")]
        key: Option<String>,
        /// Expect armored input (pass `-a false` for raw binary)
        #[arg(
            short = 'a',
            long,
            default_value_t = true,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        armor: bool,
    },
}

#[derive(Serialize)]
struct KeygenOutput {
    #[serde(rename = "SALTPACK_ENCRYPT_PK")]
    encrypt_pk: String,
    #[serde(rename = "SALTPACK_DECRYPT_SK")]
    decrypt_sk: String,
    #[serde(rename = "SALTPACK_VERIFY_PK")]
    verify_pk: String,
    #[serde(rename = "SALTPACK_SIGN_SK")]
    sign_sk: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("saltpack: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Keygen { json } => keygen(json),
        Command::Encrypt {
            keys,
            sender,
            anonymous,
            armor,
        } => run_encrypt(&keys, sender.as_deref(), anonymous, armor),
        Command::Decrypt { key, armor } => run_decrypt(key.as_deref(), armor),
        Command::Sign { key, armor } => run_sign(key.as_deref(), armor),
        Command::Verify { key, armor } => run_verify(key.as_deref(), armor),
    }
}

fn keygen(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let encryption = EncryptionKeyPair::generate();
    let signing = SigningKeyPair::generate();
    let output = KeygenOutput {
        encrypt_pk: to_hex(&encryption.public_key),
        decrypt_sk: to_hex(&encryption.secret_key),
        verify_pk: to_hex(&signing.public_key),
        sign_sk: to_hex(&signing.secret_key),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("SALTPACK_ENCRYPT_PK={}", output.encrypt_pk);
        println!("SALTPACK_DECRYPT_SK={}", output.decrypt_sk);
        println!("SALTPACK_VERIFY_PK={}", output.verify_pk);
        println!("SALTPACK_SIGN_SK={}", output.sign_sk);
    }
    Ok(())
}

fn run_encrypt(
    keys: &[String],
    sender_hex: Option<&str>,
    anonymous: bool,
    armored: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut recipients = Vec::with_capacity(keys.len());
    for key in keys {
        recipients.push(parse_key_32(key)?);
    }

    let sender = match (anonymous, sender_hex) {
        (true, _) | (false, None) => None,
        (false, Some(hex)) => Some(EncryptionKeyPair::from_secret_key(parse_key_32(hex)?)),
    };

    let plaintext = read_stdin()?;
    let message = encrypt(&plaintext, sender.as_ref(), &recipients)?;
    write_output(&message, armored, ArmorKind::Encrypted)
}

fn run_decrypt(key_hex: Option<&str>, armored: bool) -> Result<(), Box<dyn std::error::Error>> {
    let key_hex = require_key(key_hex, "SALTPACK_DECRYPT_SK")?;
    let recipient = EncryptionKeyPair::from_secret_key(parse_key_32(key_hex)?);

    let message = read_input(armored)?;
    let opened = decrypt(&message, &recipient)?;
    io::stdout().lock().write_all(&opened.plaintext)?;
    Ok(())
}

fn run_sign(key_hex: Option<&str>, armored: bool) -> Result<(), Box<dyn std::error::Error>> {
    let key_hex = require_key(key_hex, "SALTPACK_SIGN_SK")?;
    let signer = SigningKeyPair::from_secret_key(parse_key_64(key_hex)?)?;

    let message = read_stdin()?;
    let signed = sign(&message, &signer)?;
    write_output(&signed, armored, ArmorKind::Signed)
}

fn run_verify(key_hex: Option<&str>, armored: bool) -> Result<(), Box<dyn std::error::Error>> {
    let key_hex = require_key(key_hex, "SALTPACK_VERIFY_PK")?;
    let signer_pk = parse_key_32(key_hex)?;

    let message = read_input(armored)?;
    let recovered = verify(&message, &signer_pk)?;
    io::stdout().lock().write_all(&recovered)?;
    Ok(())
}

// ── key parsing ─────────────────────────────────────────────────────

/// Strip an optional `0x` / `pk_0x` / `sk_0x` prefix.
fn strip_key_prefix(input: &str) -> &str {
    input
        .strip_prefix("pk_0x")
        .or_else(|| input.strip_prefix("sk_0x"))
        .or_else(|| input.strip_prefix("0x"))
        .unwrap_or(input)
}

fn parse_key_hex(input: &str, expected_len: usize) -> Result<Vec<u8>, SaltpackError> {
    let bytes = from_hex(strip_key_prefix(input))?;
    if bytes.len() != expected_len {
        return Err(SaltpackError::InvalidArgument(format!(
            "key has {} bytes, expected {expected_len}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn parse_key_32(input: &str) -> Result<[u8; 32], SaltpackError> {
    let bytes = parse_key_hex(input, 32)?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    Ok(key)
}

fn parse_key_64(input: &str) -> Result<[u8; 64], SaltpackError> {
    let bytes = parse_key_hex(input, 64)?;
    let mut key = [0u8; 64];
    key.copy_from_slice(&bytes);
    Ok(key)
}

fn require_key<'a>(key: Option<&'a str>, env_name: &str) -> Result<&'a str, SaltpackError> {
    key.ok_or_else(|| {
        SaltpackError::InvalidArgument(format!("no key given: pass -k or set {env_name}"))
    })
}

// ── stream plumbing ─────────────────────────────────────────────────

fn read_stdin() -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin().lock().read_to_end(&mut buf)?;
    Ok(buf)
}

fn read_input(armored: bool) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let raw = read_stdin()?;
    if armored {
        let text = String::from_utf8(raw)
            .map_err(|_| SaltpackError::ArmorError("armored input is not UTF-8".into()))?;
        Ok(dearmor(&text)?)
    } else {
        Ok(raw)
    }
}

fn write_output(
    message: &[u8],
    armored: bool,
    kind: ArmorKind,
) -> Result<(), Box<dyn std::error::Error>> {
    if armored {
        println!("{}", armor(message, kind));
    } else {
        io::stdout().lock().write_all(message)?;
    }
    Ok(())
}
