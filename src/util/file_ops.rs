// File Operations for Rabin Keys and Ciphertext
// Handles JSON key files and hex-encoded ciphertext block files

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rabin::{CipherBlock, PublicKey, RabinError, Result, SecretKey};

/// File name used for the public key by [`save_keys`]
pub const PUBLIC_KEY_FILE: &str = "pub_key.json";

/// File name used for the secret key by [`save_keys`]
pub const SECRET_KEY_FILE: &str = "scrt_key.json";

/// On-disk public key: the modulus as a decimal string
#[derive(Debug, Serialize, Deserialize)]
struct PublicKeyFile {
    #[serde(rename = "N")]
    n: String,
}

/// On-disk secret key: both primes as decimal strings
#[derive(Serialize, Deserialize)]
struct SecretKeyFile {
    prime1: String,
    prime2: String,
}

fn parse_decimal(field: &str, value: &str) -> Result<BigUint> {
    value
        .parse::<BigUint>()
        .map_err(|e| RabinError::Serialization(format!("invalid {}: {}", field, e)))
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

/// Write data to file
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    Ok(())
}

/// Save both keys as pretty-printed JSON into `dir`.
/// Returns the public and secret key paths.
pub fn save_keys(dir: &Path, public_key: &PublicKey, secret_key: &SecretKey) -> Result<(PathBuf, PathBuf)> {
    let public_path = dir.join(PUBLIC_KEY_FILE);
    let secret_path = dir.join(SECRET_KEY_FILE);

    let public_file = PublicKeyFile {
        n: public_key.n().to_string(),
    };
    let secret_file = SecretKeyFile {
        prime1: secret_key.p().to_string(),
        prime2: secret_key.q().to_string(),
    };

    write_file(&public_path, serde_json::to_string_pretty(&public_file)?.as_bytes())?;
    write_file(&secret_path, serde_json::to_string_pretty(&secret_file)?.as_bytes())?;

    debug!(dir = %dir.display(), "saved Rabin keys");
    Ok((public_path, secret_path))
}

pub fn load_public_key(path: &Path) -> Result<PublicKey> {
    let file: PublicKeyFile = serde_json::from_slice(&read_file(path)?)?;
    PublicKey::new(parse_decimal("N", &file.n)?)
}

pub fn load_secret_key(path: &Path) -> Result<SecretKey> {
    let file: SecretKeyFile = serde_json::from_slice(&read_file(path)?)?;
    SecretKey::new(
        parse_decimal("prime1", &file.prime1)?,
        parse_decimal("prime2", &file.prime2)?,
    )
}

/// Encode blocks as minimal big-endian hex, one block per line
pub fn encode_blocks_hex(blocks: &[CipherBlock]) -> String {
    blocks
        .iter()
        .map(|block| hex::encode(block.to_bytes_be()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the output of [`encode_blocks_hex`]; blank lines are ignored
pub fn decode_blocks_hex(text: &str) -> Result<Vec<CipherBlock>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| -> Result<CipherBlock> { Ok(BigUint::from_bytes_be(&hex::decode(line)?)) })
        .collect()
}

/// Write ciphertext blocks to a hex file
pub fn write_ciphertext(path: &Path, blocks: &[CipherBlock]) -> Result<()> {
    write_file(path, encode_blocks_hex(blocks).as_bytes())
}

/// Read ciphertext blocks from a hex file
pub fn read_ciphertext(path: &Path) -> Result<Vec<CipherBlock>> {
    let data = read_file(path)?;
    let text = String::from_utf8(data)
        .map_err(|e| RabinError::Serialization(format!("ciphertext file is not text: {}", e)))?;
    decode_blocks_hex(&text)
}
