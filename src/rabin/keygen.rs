// Rabin Key Generation
// Implements Rabin key pair generation over two primes p ≡ q ≡ 3 (mod 4)

use std::fmt;

use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use rand::{thread_rng, CryptoRng, Rng, RngCore};
use tracing::debug;

use super::bigint::RabinBigInt;
use super::config::{block_size, RabinConfig};
use super::decrypt::decrypt;
use super::encrypt::{encrypt, CipherBlock};
use super::error::{RabinError, Result};
use super::primality::generate_prime;

/// Rabin Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    n: RabinBigInt, // Modulus p*q
}

/// Rabin Secret Key
///
/// Holds only the two prime factors. The modulus is recomputed on demand so
/// nothing here is shared with the public key.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    p: RabinBigInt,
    q: RabinBigInt,
}

impl PublicKey {
    pub fn new(n: RabinBigInt) -> Result<Self> {
        if n.is_zero() || n.is_even() {
            return Err(RabinError::InvalidArgument(
                "Rabin modulus must be odd and non-zero".to_string(),
            ));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> &RabinBigInt {
        &self.n
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Bytes per padded block
    pub fn block_size(&self) -> usize {
        block_size(&self.n)
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<CipherBlock>> {
        encrypt(self, plaintext)
    }
}

fn is_3_mod_4(x: &RabinBigInt) -> bool {
    (x % 4u8).to_u8() == Some(3)
}

impl SecretKey {
    pub fn new(p: RabinBigInt, q: RabinBigInt) -> Result<Self> {
        if !is_3_mod_4(&p) || !is_3_mod_4(&q) {
            return Err(RabinError::InvalidArgument(
                "Rabin primes must be congruent to 3 mod 4".to_string(),
            ));
        }
        if p == q {
            return Err(RabinError::InvalidArgument(
                "Rabin primes must be distinct".to_string(),
            ));
        }
        Ok(Self { p, q })
    }

    pub fn p(&self) -> &RabinBigInt {
        &self.p
    }

    pub fn q(&self) -> &RabinBigInt {
        &self.q
    }

    /// Modulus N = p*q
    pub fn n(&self) -> RabinBigInt {
        &self.p * &self.q
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey { n: self.n() }
    }

    /// Bytes per padded block
    pub fn block_size(&self) -> usize {
        block_size(&self.n())
    }

    /// Decrypt ciphertext blocks using this secret key
    pub fn decrypt(&self, blocks: &[CipherBlock]) -> Result<String> {
        decrypt(self, blocks)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("bit_length", &self.n().bits())
            .finish_non_exhaustive()
    }
}

/// Generate a Rabin key pair whose modulus has roughly `bit_length` bits.
///
/// Uses `thread_rng` for both prime candidates and Miller-Rabin witnesses.
pub fn generate_keys(bit_length: u64) -> Result<(PublicKey, SecretKey)> {
    let mut rng = thread_rng();
    let mut witness_rng = thread_rng();
    generate_keys_with(bit_length, &RabinConfig::default(), &mut rng, &mut witness_rng)
}

/// Generate a Rabin key pair with explicit configuration and random sources.
///
/// Each prime gets `bit_length / 2` bits. The pair is redrawn when the primes
/// coincide or fail the 3 mod 4 check, up to `config.max_keypair_attempts` times.
pub fn generate_keys_with<C, W>(
    bit_length: u64,
    config: &RabinConfig,
    rng: &mut C,
    witness_rng: &mut W,
) -> Result<(PublicKey, SecretKey)>
where
    C: RngCore + CryptoRng + ?Sized,
    W: Rng + ?Sized,
{
    let half_bits = bit_length / 2;
    if half_bits < 2 {
        return Err(RabinError::InvalidArgument(format!(
            "Rabin modulus needs at least 4 bits, got {}",
            bit_length
        )));
    }

    for attempt in 1..=config.max_keypair_attempts {
        let p = generate_prime(
            half_bits,
            config.miller_rabin_rounds,
            config.max_prime_attempts,
            rng,
            witness_rng,
        )?;
        let q = generate_prime(
            half_bits,
            config.miller_rabin_rounds,
            config.max_prime_attempts,
            rng,
            witness_rng,
        )?;

        match SecretKey::new(p, q) {
            Ok(secret_key) => {
                let public_key = secret_key.public_key();
                debug!(
                    attempt,
                    prime_bits = half_bits,
                    modulus_bits = public_key.bit_length(),
                    "generated Rabin key pair"
                );
                return Ok((public_key, secret_key));
            }
            Err(e) => debug!(attempt, error = %e, "rejected prime pair"),
        }
    }

    Err(RabinError::PrimeGenerationFailed {
        bits: half_bits,
        attempts: config.max_keypair_attempts,
    })
}
