// Rabin Prime Search
// Probabilistic primality tests and generation of primes p ≡ 3 (mod 4)

use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rand::{CryptoRng, Rng, RngCore};
use tracing::trace;

use super::bigint::{mod_pow, RabinBigInt};
use super::error::{RabinError, Result};
use super::jacobi::jacobi_unsigned;

/// Default Miller-Rabin round count: floor(log2(n))
pub fn default_rounds(n: &RabinBigInt) -> usize {
    n.bits().saturating_sub(1) as usize
}

// n <= 1 is not prime, 2 and 3 are, other even numbers are not.
// None means the caller has to run its probabilistic test.
fn small_case(n: &RabinBigInt) -> Option<bool> {
    if n <= &RabinBigInt::one() {
        return Some(false);
    }
    if n <= &RabinBigInt::from(3u8) {
        return Some(true);
    }
    if n.is_even() {
        return Some(false);
    }
    None
}

// Witness in [2, n-2]
fn witness<R: Rng + ?Sized>(n: &RabinBigInt, rng: &mut R) -> RabinBigInt {
    rng.gen_biguint_range(&RabinBigInt::from(2u8), &(n - 1u8))
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
///
/// `rounds` defaults to floor(log2(n)). A composite passes with probability
/// at most 4^-rounds.
pub fn is_probable_prime<R: Rng + ?Sized>(
    n: &RabinBigInt,
    rounds: Option<usize>,
    rng: &mut R,
) -> bool {
    if let Some(answer) = small_case(n) {
        return answer;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let rounds = rounds.unwrap_or_else(|| default_rounds(n));
    let two = RabinBigInt::from(2u8);

    'witness: for _ in 0..rounds {
        let a = witness(n, rng);
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Fermat primality test: a^(n-1) ≡ 1 (mod n) for `rounds` random witnesses
pub fn fermat_test<R: Rng + ?Sized>(n: &RabinBigInt, rounds: usize, rng: &mut R) -> bool {
    if let Some(answer) = small_case(n) {
        return answer;
    }

    let n_minus_one = n - 1u8;
    (0..rounds).all(|_| mod_pow(&witness(n, rng), &n_minus_one, n).is_one())
}

/// Solovay-Strassen primality test: a^((n-1)/2) ≡ (a/n) (mod n)
pub fn solovay_strassen_test<R: Rng + ?Sized>(
    n: &RabinBigInt,
    rounds: usize,
    rng: &mut R,
) -> bool {
    if let Some(answer) = small_case(n) {
        return answer;
    }

    let half = (n - 1u8) >> 1;
    let n_signed = BigInt::from(n.clone());

    for _ in 0..rounds {
        let a = witness(n, rng);
        let symbol = match jacobi_unsigned(&a, n) {
            Ok(0) | Err(_) => return false,
            Ok(symbol) => symbol,
        };
        let expected = BigInt::from(symbol).mod_floor(&n_signed).into_parts().1;
        if mod_pow(&a, &half, n) != expected {
            return false;
        }
    }

    true
}

/// Generate a random prime of exactly `bit_length` bits with p ≡ 3 (mod 4).
///
/// Candidates come from `rng`, which must be cryptographically secure since
/// the result becomes key material. Miller-Rabin witnesses come from
/// `witness_rng`. Gives up after `max_attempts` candidates.
pub fn generate_prime<C, W>(
    bit_length: u64,
    rounds: usize,
    max_attempts: usize,
    rng: &mut C,
    witness_rng: &mut W,
) -> Result<RabinBigInt>
where
    C: RngCore + CryptoRng + ?Sized,
    W: Rng + ?Sized,
{
    if bit_length < 2 {
        return Err(RabinError::InvalidArgument(format!(
            "prime bit length must be at least 2, got {}",
            bit_length
        )));
    }

    let top = RabinBigInt::one() << (bit_length - 1);

    for attempt in 1..=max_attempts {
        // Force the top bit for exact length, the low bit for oddness
        let candidate = rng.gen_biguint(bit_length) | &top | RabinBigInt::one();

        if (&candidate % 4u8).to_u8() != Some(3) {
            trace!(attempt, "candidate rejected: not 3 mod 4");
            continue;
        }

        if is_probable_prime(&candidate, Some(rounds), witness_rng) {
            trace!(attempt, bit_length, "prime found");
            return Ok(candidate);
        }
    }

    Err(RabinError::PrimeGenerationFailed {
        bits: bit_length,
        attempts: max_attempts,
    })
}
