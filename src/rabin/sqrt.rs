// Modular Square Roots
// Square roots of quadratic residues modulo an odd prime

use num_traits::{One, ToPrimitive};

use super::bigint::{mod_pow, RabinBigInt};
use super::error::{RabinError, Result};
use super::jacobi::jacobi_unsigned;

fn require_residue(a: &RabinBigInt, p: &RabinBigInt) -> Result<()> {
    if jacobi_unsigned(a, p)? != 1 {
        return Err(RabinError::NotAResidue {
            value: a.clone(),
            modulus: p.clone(),
        });
    }
    Ok(())
}

/// Both square roots of `a` modulo an odd prime `p`, as `(r, p - r)`.
///
/// Uses the closed form for p ≡ 3 (mod 4) and Tonelli-Shanks otherwise.
/// Fails with `NotAResidue` unless the Jacobi symbol (a/p) is 1.
pub fn square_roots(a: &RabinBigInt, p: &RabinBigInt) -> Result<(RabinBigInt, RabinBigInt)> {
    if (p % 4u8).to_u8() == Some(3) {
        sqrt_3_mod_4(a, p)
    } else {
        tonelli_shanks(a, p)
    }
}

/// Closed form r = a^((p+1)/4) mod p, valid only for p ≡ 3 (mod 4)
pub fn sqrt_3_mod_4(a: &RabinBigInt, p: &RabinBigInt) -> Result<(RabinBigInt, RabinBigInt)> {
    if (p % 4u8).to_u8() != Some(3) {
        return Err(RabinError::InvalidArgument(format!("{} is not 3 mod 4", p)));
    }

    let a = a % p;
    require_residue(&a, p)?;

    let root = mod_pow(&a, &((p + 1u8) >> 2), p);
    let other = p - &root;
    Ok((root, other))
}

/// Tonelli-Shanks square root for any odd prime p.
pub fn tonelli_shanks(a: &RabinBigInt, p: &RabinBigInt) -> Result<(RabinBigInt, RabinBigInt)> {
    let a = a % p;
    require_residue(&a, p)?;

    // Smallest quadratic non-residue; an odd prime always has one below it
    let mut non_residue = RabinBigInt::from(2u8);
    while jacobi_unsigned(&non_residue, p)? != -1 {
        non_residue += 1u8;
        if non_residue >= *p {
            return Err(RabinError::InvalidArgument(format!(
                "no quadratic non-residue below {}, modulus is not prime",
                p
            )));
        }
    }

    // p - 1 = h * 2^k with h odd
    let p_minus_one = p - 1u8;
    let k = p_minus_one.trailing_zeros().unwrap_or(0);
    let h = &p_minus_one >> k;

    let mut root = mod_pow(&a, &((&h + 1u8) >> 1), p);
    let mut error = mod_pow(&a, &h, p);
    let mut correction = mod_pow(&non_residue, &h, p);
    let mut order = k;

    // Each pass strictly lowers the order of `error`, so at most k - 1 passes
    for _ in 1..k.max(1) {
        if error.is_one() {
            break;
        }

        // Least m with error^(2^m) == 1
        let mut m = 0u64;
        let mut power = error.clone();
        while !power.is_one() {
            power = (&power * &power) % p;
            m += 1;
            if m >= order {
                return Err(RabinError::NotAResidue {
                    value: a.clone(),
                    modulus: p.clone(),
                });
            }
        }

        let mut b = correction.clone();
        for _ in 0..(order - m - 1) {
            b = (&b * &b) % p;
        }

        root = (&root * &b) % p;
        correction = (&b * &b) % p;
        error = (&error * &correction) % p;
        order = m;
    }

    if !error.is_one() {
        return Err(RabinError::NotAResidue { value: a, modulus: p.clone() });
    }

    let other = p - &root;
    Ok((root, other))
}
