// Rabin Encryption Implementation
// Chunks the message, pads each chunk and squares it modulo N

use num_bigint::BigUint;
use rand::{thread_rng, CryptoRng, RngCore};
use tracing::debug;

use super::bigint::{from_bytes, mod_pow};
use super::config::RabinConfig;
use super::error::{RabinError, Result};
use super::keygen::PublicKey;
use super::padding::{pad_block, PaddedData};

/// One encrypted block: the square of a padded block modulo N
pub type CipherBlock = BigUint;

/// Encrypt a string using the Rabin public key
pub fn encrypt(public_key: &PublicKey, plaintext: &str) -> Result<Vec<CipherBlock>> {
    encrypt_with(public_key, plaintext, &RabinConfig::default(), &mut thread_rng())
}

/// Encrypt a string with explicit configuration and padding randomness
pub fn encrypt_with<R: RngCore + CryptoRng + ?Sized>(
    public_key: &PublicKey,
    plaintext: &str,
    config: &RabinConfig,
    rng: &mut R,
) -> Result<Vec<CipherBlock>> {
    encrypt_bytes(public_key, plaintext.as_bytes(), config, rng)
}

/// Encrypt raw bytes, one block per `max_chunk_len` bytes.
///
/// An empty input produces no blocks.
pub fn encrypt_bytes<R: RngCore + CryptoRng + ?Sized>(
    public_key: &PublicKey,
    plaintext: &[u8],
    config: &RabinConfig,
    rng: &mut R,
) -> Result<Vec<CipherBlock>> {
    let block_size = public_key.block_size();
    let max_chunk_len = config.max_chunk_len(block_size)?;

    let blocks = plaintext
        .chunks(max_chunk_len)
        .map(|chunk| -> Result<CipherBlock> {
            let padded = pad_block(chunk, block_size, config, &mut *rng)?;
            encrypt_block(public_key, &padded)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        bytes = plaintext.len(),
        blocks = blocks.len(),
        block_size,
        "encrypted message"
    );

    Ok(blocks)
}

/// Compute c = m^2 mod n for a padded block.
///
/// The block must have been padded to this key's block size.
pub fn encrypt_block(public_key: &PublicKey, padded: &PaddedData) -> Result<CipherBlock> {
    let block_size = public_key.block_size();
    if padded.expected_size != block_size || padded.data.len() != block_size {
        return Err(RabinError::InvalidArgument(format!(
            "padded block has {} bytes (expected {}), key block size is {}",
            padded.data.len(),
            padded.expected_size,
            block_size
        )));
    }

    let m = from_bytes(&padded.data);
    Ok(mod_pow(&m, &BigUint::from(2u8), public_key.n()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rabin::bigint::from_u64;
    use crate::rabin::keygen::generate_keys;

    #[test]
    fn test_encrypt_string() {
        let (public_key, _) = generate_keys(512).unwrap();
        let blocks = encrypt(&public_key, "Hello, Rabin!").unwrap();

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0] < *public_key.n());
    }

    #[test]
    fn test_encrypt_block_count() {
        let (public_key, _) = generate_keys(512).unwrap();
        // 21 bytes per block for a 64-byte block
        let message = "x".repeat(43);

        let blocks = encrypt(&public_key, &message).unwrap();
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_encrypt_empty() {
        let (public_key, _) = generate_keys(512).unwrap();
        assert!(encrypt(&public_key, "").unwrap().is_empty());
    }

    #[test]
    fn test_encrypt_is_randomized() {
        let (public_key, _) = generate_keys(512).unwrap();
        let first = encrypt(&public_key, "same text").unwrap();
        let second = encrypt(&public_key, "same text").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_encrypt_block_squares() {
        let public_key = PublicKey::new(from_u64(77)).unwrap();
        let padded = PaddedData {
            data: vec![20],
            expected_size: 1,
        };
        assert_eq!(encrypt_block(&public_key, &padded).unwrap(), from_u64(400 % 77));
    }

    #[test]
    fn test_encrypt_block_rejects_foreign_block_size() {
        let (small_key, _) = generate_keys(512).unwrap();
        let (large_key, _) = generate_keys(1024).unwrap();
        let padded = pad_block(
            b"sized for 512 bits",
            small_key.block_size(),
            &RabinConfig::default(),
            &mut thread_rng(),
        )
        .unwrap();

        assert!(encrypt_block(&small_key, &padded).is_ok());
        assert!(matches!(
            encrypt_block(&large_key, &padded),
            Err(RabinError::InvalidArgument(_))
        ));

        let truncated = PaddedData {
            data: padded.data[1..].to_vec(),
            expected_size: padded.expected_size,
        };
        assert!(matches!(
            encrypt_block(&small_key, &truncated),
            Err(RabinError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_modulus_too_small() {
        // 300-bit modulus: 38-byte blocks cannot hold header, digest and padding
        let (public_key, _) = generate_keys(300).unwrap();
        let result = encrypt(&public_key, "a");
        assert!(matches!(result, Err(RabinError::InvalidArgument(_))));
    }
}
