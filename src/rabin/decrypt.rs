// Rabin Decryption Implementation
// Per-prime square roots, CRT recombination into four candidates and
// digest-checked selection of the true plaintext block

use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, warn};

use super::bigint::{extended_gcd, reduce, to_fixed_bytes, RabinBigInt};
use super::config::block_size;
use super::encrypt::CipherBlock;
use super::error::{RabinError, Result};
use super::keygen::SecretKey;
use super::padding::unpad_block;
use super::sqrt::square_roots;

/// Decrypt ciphertext blocks into a string
pub fn decrypt(secret_key: &SecretKey, blocks: &[CipherBlock]) -> Result<String> {
    let plaintext = decrypt_to_bytes(secret_key, blocks)?;
    Ok(String::from_utf8(plaintext)?)
}

/// Decrypt ciphertext blocks into raw bytes.
///
/// A single undecodable block fails the whole call.
pub fn decrypt_to_bytes(secret_key: &SecretKey, blocks: &[CipherBlock]) -> Result<Vec<u8>> {
    let decryptor = RabinDecryptor::new(secret_key)?;

    let mut plaintext = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        plaintext.extend(decryptor.decrypt_block(index, block)?);
    }

    debug!(blocks = blocks.len(), bytes = plaintext.len(), "decrypted message");
    Ok(plaintext)
}

/// Decryption context with the CRT coefficients computed once per key
pub struct RabinDecryptor<'a> {
    key: &'a SecretKey,
    n: RabinBigInt,
    yp: BigInt,
    yq: BigInt,
    block_size: usize,
}

impl<'a> RabinDecryptor<'a> {
    pub fn new(key: &'a SecretKey) -> Result<Self> {
        // yp*p + yq*q = 1
        let (gcd, yp, yq) = extended_gcd(key.p(), key.q());
        if !gcd.is_one() {
            return Err(RabinError::ArithmeticError(format!(
                "secret primes share a factor {}",
                gcd
            )));
        }

        let n = key.n();
        Ok(Self {
            key,
            block_size: block_size(&n),
            n,
            yp,
            yq,
        })
    }

    /// The four square roots of `c` modulo N, in the order M1, M2, M3, M4
    pub fn candidates(&self, c: &CipherBlock) -> Result<[RabinBigInt; 4]> {
        let mp = prime_root(c, self.key.p())?;
        let mq = prime_root(c, self.key.q())?;
        Ok(combine_roots(
            &mp,
            &mq,
            self.key.p(),
            self.key.q(),
            &self.yp,
            &self.yq,
            &self.n,
        ))
    }

    /// Decrypt one block; `index` is only used for error reporting
    pub fn decrypt_block(&self, index: usize, c: &CipherBlock) -> Result<Vec<u8>> {
        let candidates = match self.candidates(c) {
            Ok(candidates) => candidates,
            Err(RabinError::NotAResidue { .. }) => {
                warn!(block = index, "ciphertext block is not a quadratic residue");
                return Err(RabinError::DecodingFailure { block: index });
            }
            Err(e) => return Err(e),
        };

        select_candidate(&candidates, self.block_size, unpad_block).ok_or_else(|| {
            warn!(block = index, "no candidate root passed hash verification");
            RabinError::DecodingFailure { block: index }
        })
    }
}

// N together with the Bezout coefficients factors N, so none of them are printed
impl fmt::Debug for RabinDecryptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RabinDecryptor")
            .field("key", self.key)
            .field("block_size", &self.block_size)
            .finish_non_exhaustive()
    }
}

// First root of c mod p; zero residues have the single root zero
fn prime_root(c: &CipherBlock, p: &RabinBigInt) -> Result<RabinBigInt> {
    let residue = c % p;
    if residue.is_zero() {
        return Ok(residue);
    }
    Ok(square_roots(&residue, p)?.0)
}

/// CRT recombination of the prime-local roots `mp` (mod p) and `mq` (mod q).
///
/// M1 = (yp*p*mq + yq*q*mp) mod n, M2 = n - M1,
/// M3 = (yp*p*mq - yq*q*mp) mod n, M4 = n - M3
pub fn combine_roots(
    mp: &RabinBigInt,
    mq: &RabinBigInt,
    p: &RabinBigInt,
    q: &RabinBigInt,
    yp: &BigInt,
    yq: &BigInt,
    n: &RabinBigInt,
) -> [RabinBigInt; 4] {
    let p_term = yp * BigInt::from(p * mq);
    let q_term = yq * BigInt::from(q * mp);

    let m1 = reduce(&(&p_term + &q_term), n);
    let m3 = reduce(&(&p_term - &q_term), n);
    let m2 = (n - &m1) % n;
    let m4 = (n - &m3) % n;

    [m1, m2, m3, m4]
}

/// The four square roots of `c` modulo p*q, in the order M1, M2, M3, M4
pub fn candidate_roots(
    c: &CipherBlock,
    p: &RabinBigInt,
    q: &RabinBigInt,
    yp: &BigInt,
    yq: &BigInt,
) -> Result<[RabinBigInt; 4]> {
    let mp = prime_root(c, p)?;
    let mq = prime_root(c, q)?;
    Ok(combine_roots(&mp, &mq, p, q, yp, yq, &(p * q)))
}

/// Try candidates in order and return the first one `decode` accepts
pub fn select_candidate<F>(
    candidates: &[RabinBigInt],
    block_size: usize,
    decode: F,
) -> Option<Vec<u8>>
where
    F: Fn(&[u8]) -> Option<Vec<u8>>,
{
    candidates
        .iter()
        .filter_map(|candidate| to_fixed_bytes(candidate, block_size))
        .find_map(|bytes| decode(&bytes))
}
