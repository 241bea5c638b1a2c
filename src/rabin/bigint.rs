// Rabin Big Integer Operations
// Modular arithmetic engine on top of num-bigint: exponentiation, extended
// Euclid, inverses and small congruence solvers

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::error::{RabinError, Result};

/// Rabin Big Integer type alias
pub type RabinBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RabinBigInt {
    RabinBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RabinBigInt {
    RabinBigInt::from_bytes_be(bytes)
}

/// Convert big integer to exactly `len` big-endian bytes, left-padded with zeros.
/// Returns None if the value does not fit.
pub fn to_fixed_bytes(n: &RabinBigInt, len: usize) -> Option<Vec<u8>> {
    if n.is_zero() {
        return Some(vec![0u8; len]);
    }
    let bytes = n.to_bytes_be();
    if bytes.len() > len {
        return None;
    }
    let mut result = vec![0u8; len];
    result[len - bytes.len()..].copy_from_slice(&bytes);
    Some(result)
}

/// Reduce a signed value into `[0, modulus)`
pub fn reduce(x: &BigInt, modulus: &RabinBigInt) -> RabinBigInt {
    let m = BigInt::from(modulus.clone());
    x.mod_floor(&m).into_parts().1
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RabinBigInt, exp: &RabinBigInt, modulus: &RabinBigInt) -> RabinBigInt {
    if modulus.is_one() {
        return RabinBigInt::zero();
    }

    let mut result = RabinBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

fn pow_unbounded(base: &RabinBigInt, exp: &RabinBigInt) -> RabinBigInt {
    let mut result = RabinBigInt::one();
    let mut base = base.clone();
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result *= &base;
        }
        exp >>= 1;
        if !exp.is_zero() {
            base = &base * &base;
        }
    }

    result
}

/// Exponentiation with an optional modulus and a signed exponent.
///
/// A negative exponent inverts `base` modulo `modulus` first, so it requires
/// `gcd(base, modulus) == 1` and a modulus to be present.
pub fn pow_mod(
    base: &RabinBigInt,
    exponent: &BigInt,
    modulus: Option<&RabinBigInt>,
) -> Result<RabinBigInt> {
    if let Some(m) = modulus {
        if m.is_zero() {
            return Err(RabinError::InvalidArgument("modulus must be positive".to_string()));
        }
    }

    let magnitude = exponent.magnitude();

    if exponent.is_negative() {
        let m = modulus.ok_or_else(|| {
            RabinError::InvalidArgument("negative exponent requires a modulus".to_string())
        })?;
        let inverse = mod_inverse(base, m)?;
        return Ok(mod_pow(&inverse, magnitude, m));
    }

    Ok(match modulus {
        Some(m) => mod_pow(base, magnitude, m),
        None => pow_unbounded(base, magnitude),
    })
}

/// Extended Euclidean Algorithm
/// Returns (g, a, b) such that a*x + b*y = g = gcd(x, y)
///
/// Iterative form of the textbook recursion
/// `egcd(0, y) = (y, 0, 1)`, `egcd(x, y) = (d, b' - (y / x) * a', a')`
/// where `(d, a', b') = egcd(y mod x, x)`; both yield the same coefficients.
pub fn extended_gcd(x: &RabinBigInt, y: &RabinBigInt) -> (RabinBigInt, BigInt, BigInt) {
    // Remainder sequence starts at (y, x), matching the recursion's argument swap
    let mut old_r = BigInt::from(y.clone());
    let mut r = BigInt::from(x.clone());
    let mut old_s = BigInt::one(); // coefficient of y
    let mut s = BigInt::zero();
    let mut old_t = BigInt::zero(); // coefficient of x
    let mut t = BigInt::one();

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r.into_parts().1, old_t, old_s)
}

/// Compute modular inverse: a^(-1) mod m
pub fn mod_inverse(a: &RabinBigInt, m: &RabinBigInt) -> Result<RabinBigInt> {
    if m.is_zero() {
        return Err(RabinError::InvalidArgument("modulus must be positive".to_string()));
    }

    let (gcd, x, _) = extended_gcd(a, m);
    if !gcd.is_one() {
        return Err(RabinError::ArithmeticError(format!(
            "{} has no inverse modulo {} (gcd = {})",
            a, m, gcd
        )));
    }

    Ok(reduce(&x, m))
}

/// Solve the linear congruence a*x ≡ b (mod m).
///
/// Returns every solution in `[0, m)`, or None when gcd(a, m) does not divide b.
pub fn solve_linear_congruence(
    a: &RabinBigInt,
    b: &RabinBigInt,
    m: &RabinBigInt,
) -> Result<Option<Vec<RabinBigInt>>> {
    if m.is_zero() {
        return Err(RabinError::InvalidArgument("modulus must be positive".to_string()));
    }

    let (gcd, x, _) = extended_gcd(a, m);
    if !(b % &gcd).is_zero() {
        return Ok(None);
    }

    let b = b / &gcd;
    let m_reduced = m / &gcd;
    let x0 = reduce(&(x * BigInt::from(b)), &m_reduced);

    let mut solutions = Vec::new();
    let mut k = RabinBigInt::zero();
    while k < gcd {
        solutions.push(&x0 + &k * &m_reduced);
        k += 1u8;
    }

    Ok(Some(solutions))
}

/// Chinese Remainder Theorem for pairwise coprime moduli.
///
/// Takes `(residue, modulus)` pairs and returns `(x mod M, M)` with M the
/// product of the moduli.
pub fn crt(system: &[(RabinBigInt, RabinBigInt)]) -> Result<(RabinBigInt, RabinBigInt)> {
    let mut product = RabinBigInt::one();
    for (_, m) in system {
        if m.is_zero() {
            return Err(RabinError::InvalidArgument("modulus must be positive".to_string()));
        }
        product *= m;
    }

    let mut x = RabinBigInt::zero();
    for (b, m) in system {
        let partial = &product / m;
        let inverse = mod_inverse(&(&partial % m), m)?;
        x += b * &partial * inverse;
    }

    Ok((x % &product, product))
}

/// Solve a system of congruences a_i*x ≡ b_i (mod m_i).
///
/// Each congruence is reduced to its smallest solution, then the results are
/// combined with [`crt`]. Returns None if any congruence has no solution.
pub fn solve_congruence_system(
    system: &[(RabinBigInt, RabinBigInt, RabinBigInt)],
) -> Result<Option<(RabinBigInt, RabinBigInt)>> {
    let mut reduced = Vec::with_capacity(system.len());
    for (a, b, m) in system {
        match solve_linear_congruence(a, b, m)? {
            Some(solutions) => match solutions.into_iter().next() {
                Some(first) => reduced.push((first, m.clone())),
                None => return Ok(None),
            },
            None => return Ok(None),
        }
    }

    crt(&reduced).map(Some)
}
