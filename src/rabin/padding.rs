// Rabin Block Padding
// Format: 0x00 || 0x02 || PS || 0x00 || chunk || SHA-256(chunk)
// PS = padding string of non-zero random bytes (at least 8 bytes)

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use super::config::{RabinConfig, HASH_LEN, HEADER_LEN};
use super::error::{RabinError, Result};

/// Padded data structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedData {
    pub data: Vec<u8>,
    pub expected_size: usize,
}

/// Digest embedded after each chunk, truncated to `HASH_LEN` bytes
pub fn chunk_digest(chunk: &[u8]) -> [u8; HASH_LEN] {
    let mut digest = [0u8; HASH_LEN];
    digest.copy_from_slice(&Sha256::digest(chunk)[..HASH_LEN]);
    digest
}

/// Random padding string with no zero bytes.
///
/// Zero bytes are redrawn, so the first 0x00 after the marker always ends PS.
pub fn generate_padding<R: RngCore + CryptoRng + ?Sized>(len: usize, rng: &mut R) -> Vec<u8> {
    let mut padding = vec![0u8; len];
    rng.fill_bytes(&mut padding);

    for byte in &mut padding {
        while *byte == 0 {
            let mut fresh = [0u8; 1];
            rng.fill_bytes(&mut fresh);
            *byte = fresh[0];
        }
    }

    padding
}

/// Pad a plaintext chunk into a block of exactly `block_size` bytes.
///
/// Fails with `MessageTooLong` when fewer than `config.min_padding_len`
/// padding bytes would remain.
pub fn pad_block<R: RngCore + CryptoRng + ?Sized>(
    chunk: &[u8],
    block_size: usize,
    config: &RabinConfig,
    rng: &mut R,
) -> Result<PaddedData> {
    let padding_len = block_size
        .checked_sub(chunk.len() + HASH_LEN + HEADER_LEN)
        .filter(|len| *len >= config.min_padding_len)
        .ok_or(RabinError::MessageTooLong {
            chunk_len: chunk.len(),
            padding_len: block_size.saturating_sub(chunk.len() + HASH_LEN + HEADER_LEN),
            min: config.min_padding_len,
        })?;

    let mut result = Vec::with_capacity(block_size);
    result.push(0x00);
    result.push(0x02);
    result.extend_from_slice(&generate_padding(padding_len, rng));
    result.push(0x00);
    result.extend_from_slice(chunk);
    result.extend_from_slice(&chunk_digest(chunk));

    Ok(PaddedData {
        data: result,
        expected_size: block_size,
    })
}

/// Recover the chunk from a candidate block, or None if its digest does not match.
///
/// The padding ends at the first zero byte at or after offset 2; everything
/// after it is `chunk || digest`.
pub fn unpad_block(block: &[u8]) -> Option<Vec<u8>> {
    let separator_pos = block.get(2..)?.iter().position(|&b| b == 0x00)? + 2;
    let data_with_hash = &block[separator_pos + 1..];

    if data_with_hash.len() < HASH_LEN {
        return None;
    }

    let (chunk, digest) = data_with_hash.split_at(data_with_hash.len() - HASH_LEN);
    if chunk_digest(chunk)[..] == digest[..] {
        Some(chunk.to_vec())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn test_pad_block() {
        let data = b"Hello";
        let padded = pad_block(data, 64, &RabinConfig::default(), &mut thread_rng()).unwrap();
        assert_eq!(padded.data.len(), 64);
        assert_eq!(padded.expected_size, 64);

        // Check structure
        assert_eq!(padded.data[0], 0x00);
        assert_eq!(padded.data[1], 0x02);
        let separator = 64 - HASH_LEN - data.len() - 1;
        assert_eq!(padded.data[separator], 0x00);
        assert_eq!(&padded.data[separator + 1..separator + 1 + data.len()], data);
        assert_eq!(&padded.data[64 - HASH_LEN..], &chunk_digest(data)[..]);

        // Check that padding bytes are non-zero
        for &byte in &padded.data[2..separator] {
            assert_ne!(byte, 0x00);
        }
    }

    #[test]
    fn test_pad_max_size() {
        // 64 - 3 - 32 - 8 = 21 bytes
        let config = RabinConfig::default();
        let padded = pad_block(&[0u8; 21], 64, &config, &mut thread_rng()).unwrap();
        assert_eq!(padded.data.len(), 64);

        let result = pad_block(&[0u8; 22], 64, &config, &mut thread_rng());
        assert!(matches!(
            result,
            Err(RabinError::MessageTooLong { chunk_len: 22, padding_len: 7, min: 8 })
        ));
    }

    #[test]
    fn test_padding_never_contains_zero() {
        let mut rng = thread_rng();
        for _ in 0..50 {
            assert!(generate_padding(512, &mut rng).iter().all(|&b| b != 0));
        }
    }

    #[test]
    fn test_unpad_block() {
        let chunk = "Привет".as_bytes();
        let padded = pad_block(chunk, 80, &RabinConfig::default(), &mut thread_rng()).unwrap();
        assert_eq!(unpad_block(&padded.data).unwrap(), chunk);
    }

    #[test]
    fn test_unpad_empty_chunk() {
        let padded = pad_block(b"", 64, &RabinConfig::default(), &mut thread_rng()).unwrap();
        assert_eq!(unpad_block(&padded.data).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_unpad_rejects_bad_digest() {
        let mut padded = pad_block(b"Test data", 64, &RabinConfig::default(), &mut thread_rng())
            .unwrap()
            .data;
        let last = padded.len() - 1;
        padded[last] ^= 0x01;
        assert!(unpad_block(&padded).is_none());
    }

    #[test]
    fn test_unpad_rejects_missing_separator() {
        assert!(unpad_block(&[0x00, 0x02, 0xFF, 0xFF, 0x01]).is_none());
        assert!(unpad_block(&[0x00]).is_none());
    }

    #[test]
    fn test_unpad_rejects_short_tail() {
        let mut block = vec![0x00, 0x02, 0xAA, 0x00];
        block.extend_from_slice(&[0x11; HASH_LEN - 1]);
        assert!(unpad_block(&block).is_none());
    }
}
