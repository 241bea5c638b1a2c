// Rabin Configuration
// Tunable parameters for prime search and block padding

use super::bigint::RabinBigInt;
use super::error::{RabinError, Result};

/// Length of the SHA-256 digest embedded in every block
pub const HASH_LEN: usize = 32;

/// 0x00 0x02 marker plus the 0x00 delimiter that ends the padding
pub const HEADER_LEN: usize = 3;

/// Configuration for key generation and encryption
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RabinConfig {
    /// Miller-Rabin rounds used when accepting a prime candidate
    pub miller_rabin_rounds: usize,
    /// Candidates drawn per prime before giving up
    pub max_prime_attempts: usize,
    /// Times the (p, q) pair is redrawn before giving up
    pub max_keypair_attempts: usize,
    /// Minimum number of random padding bytes per block
    pub min_padding_len: usize,
}

impl Default for RabinConfig {
    fn default() -> Self {
        Self {
            miller_rabin_rounds: 50,
            max_prime_attempts: 100_000,
            max_keypair_attempts: 16,
            min_padding_len: 8,
        }
    }
}

impl RabinConfig {
    pub fn with_miller_rabin_rounds(mut self, rounds: usize) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    pub fn with_max_prime_attempts(mut self, attempts: usize) -> Self {
        self.max_prime_attempts = attempts;
        self
    }

    pub fn with_max_keypair_attempts(mut self, attempts: usize) -> Self {
        self.max_keypair_attempts = attempts;
        self
    }

    pub fn with_min_padding_len(mut self, len: usize) -> Self {
        self.min_padding_len = len;
        self
    }

    /// Largest plaintext chunk that fits a block of `block_size` bytes
    /// while keeping at least `min_padding_len` padding bytes.
    pub fn max_chunk_len(&self, block_size: usize) -> Result<usize> {
        let overhead = HEADER_LEN + HASH_LEN + self.min_padding_len;
        match block_size.checked_sub(overhead) {
            Some(len) if len > 0 => Ok(len),
            _ => Err(RabinError::InvalidArgument(format!(
                "{}-byte blocks cannot hold {} bytes of header, digest and padding plus a chunk",
                block_size, overhead
            ))),
        }
    }
}

/// Block size in bytes for modulus `n`: ceil(bitlength(n) / 8)
pub fn block_size(n: &RabinBigInt) -> usize {
    ((n.bits() + 7) / 8) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rabin::bigint::from_u64;

    #[test]
    fn test_defaults() {
        let config = RabinConfig::default();
        assert_eq!(config.miller_rabin_rounds, 50);
        assert_eq!(config.min_padding_len, 8);
    }

    #[test]
    fn test_builder() {
        let config = RabinConfig::default()
            .with_miller_rabin_rounds(20)
            .with_max_prime_attempts(10)
            .with_max_keypair_attempts(2)
            .with_min_padding_len(11);
        assert_eq!(config.miller_rabin_rounds, 20);
        assert_eq!(config.max_prime_attempts, 10);
        assert_eq!(config.max_keypair_attempts, 2);
        assert_eq!(config.min_padding_len, 11);
    }

    #[test]
    fn test_max_chunk_len_reports_overhead() {
        let config = RabinConfig::default().with_min_padding_len(11);
        match config.max_chunk_len(40) {
            Err(RabinError::InvalidArgument(message)) => {
                assert!(message.contains("40-byte"), "{}", message);
                assert!(message.contains("46 bytes"), "{}", message);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_block_size() {
        assert_eq!(block_size(&from_u64(77)), 1);
        assert_eq!(block_size(&from_u64(255)), 1);
        assert_eq!(block_size(&from_u64(256)), 2);
        assert_eq!(block_size(&(RabinBigInt::from(1u8) << 511u32)), 64);
    }

    #[test]
    fn test_max_chunk_len() {
        let config = RabinConfig::default();
        // 512-bit modulus: 64 - 3 - 32 - 8
        assert_eq!(config.max_chunk_len(64).unwrap(), 21);
        assert_eq!(config.max_chunk_len(44).unwrap(), 1);
        assert!(matches!(
            config.max_chunk_len(43),
            Err(RabinError::InvalidArgument(_))
        ));
        assert!(config.max_chunk_len(1).is_err());
    }
}
