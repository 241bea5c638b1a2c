// Jacobi Symbol
// Binary reduction algorithm with quadratic reciprocity

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::error::{RabinError, Result};

/// Jacobi symbol (a/n) for odd positive n.
///
/// Returns -1, 0 or 1. Fails with `InvalidArgument` when n is even or not positive.
pub fn jacobi_symbol(a: &BigInt, n: &BigInt) -> Result<i8> {
    if !n.is_positive() || n.is_even() {
        return Err(RabinError::InvalidArgument(format!(
            "Jacobi symbol modulus must be an odd positive integer, got {}",
            n
        )));
    }

    let mut a = a.mod_floor(n);
    let mut n = n.clone();
    let mut result = 1i8;

    while !a.is_zero() {
        while a.is_even() {
            a >>= 1;
            if matches!(residue(&n, 8), 3 | 5) {
                result = -result;
            }
        }

        std::mem::swap(&mut a, &mut n);

        if residue(&a, 4) == 3 && residue(&n, 4) == 3 {
            result = -result;
        }

        a = a.mod_floor(&n);
    }

    if n.is_one() {
        Ok(result)
    } else {
        Ok(0)
    }
}

/// Jacobi symbol for unsigned operands
pub fn jacobi_unsigned(a: &BigUint, n: &BigUint) -> Result<i8> {
    jacobi_symbol(&BigInt::from(a.clone()), &BigInt::from(n.clone()))
}

// n is non-negative inside the loop, so the low bits give the residue
fn residue(n: &BigInt, modulus: u8) -> u8 {
    (n.magnitude() % modulus).to_u8().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legendre_by_search(a: i64, p: i64) -> i8 {
        let a = a.rem_euclid(p);
        if a == 0 {
            return 0;
        }
        if (1..p).any(|x| (x * x) % p == a) {
            1
        } else {
            -1
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(jacobi_symbol(&BigInt::from(1001), &BigInt::from(9907)).unwrap(), -1);
        assert_eq!(jacobi_symbol(&BigInt::from(19), &BigInt::from(45)).unwrap(), 1);
        assert_eq!(jacobi_symbol(&BigInt::from(8), &BigInt::from(21)).unwrap(), -1);
        assert_eq!(jacobi_symbol(&BigInt::from(5), &BigInt::from(21)).unwrap(), 1);
        assert_eq!(jacobi_symbol(&BigInt::from(6), &BigInt::from(15)).unwrap(), 0);
    }

    #[test]
    fn test_matches_legendre_for_primes() {
        for p in [3i64, 5, 7, 11, 13, 17, 19, 23, 29, 31, 97] {
            for a in -5..(2 * p) {
                let expected = legendre_by_search(a, p);
                let actual = jacobi_symbol(&BigInt::from(a), &BigInt::from(p)).unwrap();
                assert_eq!(actual, expected, "({}/{})", a, p);
            }
        }
    }

    #[test]
    fn test_multiplicative_in_modulus() {
        // (a/15) = (a/3)(a/5)
        for a in 0..30i64 {
            let composite = jacobi_symbol(&BigInt::from(a), &BigInt::from(15)).unwrap();
            let product = legendre_by_search(a, 3) * legendre_by_search(a, 5);
            assert_eq!(composite, product);
        }
    }

    #[test]
    fn test_modulus_one() {
        assert_eq!(jacobi_symbol(&BigInt::from(7), &BigInt::one()).unwrap(), 1);
    }

    #[test]
    fn test_invalid_modulus() {
        for n in [0i64, -3, 4, 10] {
            let result = jacobi_symbol(&BigInt::from(3), &BigInt::from(n));
            assert!(matches!(result, Err(RabinError::InvalidArgument(_))));
        }
    }
}
