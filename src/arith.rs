// Modular Arithmetic
// Fast exponentiation, extended Euclid, modular inverse and CRT recombination
// on top of num-bigint

use crate::error::RsaError;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Modular exponentiation: base^exp mod modulus.
/// Uses binary square-and-multiply, O(log exp) modular multiplications.
///
/// `modulus == 0` is rejected; `modulus == 1` yields 0 for every base and
/// exponent. The loop squares unconditionally across the full bit width of
/// the exponent, so its multiplication count does not depend on the exponent's
/// bit pattern (constant-shape intent; the underlying bigint multiply makes
/// no hard timing guarantee).
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> Result<BigUint, RsaError> {
    if modulus.is_zero() {
        return Err(RsaError::InvalidInput("zero modulus"));
    }
    Ok(mod_pow_nonzero(base, exp, modulus))
}

/// Square-and-multiply core, callers guarantee `modulus >= 1`.
pub(crate) fn mod_pow_nonzero(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }

    let mut result = BigUint::one();
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

/// Extended Euclidean Algorithm over signed integers.
/// Returns (g, x, y) such that a*x + b*y = g = gcd(a, b).
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Compute the modular inverse a^(-1) mod m, normalized into [0, m-1].
/// Fails with `NoInverse` when gcd(a, m) != 1.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, RsaError> {
    if m.is_zero() {
        return Err(RsaError::InvalidInput("zero modulus"));
    }

    let m_signed = BigInt::from(m.clone());
    let (g, x, _) = extended_gcd(&BigInt::from(a.clone()), &m_signed);

    if !g.is_one() {
        return Err(RsaError::NoInverse);
    }

    // mod_floor of a positive modulus lands in [0, m)
    x.mod_floor(&m_signed)
        .to_biguint()
        .ok_or(RsaError::InvalidInput("floor reduction produced a negative value"))
}

/// Chinese Remainder Theorem reconstruction.
///
/// Given residues `(m_i, x_i)` with pairwise-coprime moduli, returns the
/// unique x in [0, prod(m_i) - 1] with x = x_i mod m_i. Folds the two-term
/// formula x = x_p + p * (((x_q - x_p) * p^(-1)) mod q) over the slice.
/// Non-coprime moduli (e.g. p == q) are reported as `InvalidInput`.
pub fn crt_combine(residues: &[(BigUint, BigUint)]) -> Result<BigUint, RsaError> {
    let (first_m, first_x) = residues
        .first()
        .ok_or(RsaError::InvalidInput("empty residue set"))?;
    if first_m.is_zero() {
        return Err(RsaError::InvalidInput("zero CRT modulus"));
    }

    let mut acc_m = first_m.clone();
    let mut acc_x = first_x % first_m;

    for (m_i, x_i) in &residues[1..] {
        if m_i.is_zero() {
            return Err(RsaError::InvalidInput("zero CRT modulus"));
        }
        let inv = mod_inverse(&acc_m, m_i).map_err(|e| match e {
            RsaError::NoInverse => RsaError::InvalidInput("CRT moduli are not pairwise coprime"),
            other => other,
        })?;

        // t = ((x_i - acc_x) * acc_m^(-1)) mod m_i, computed signed
        let diff = BigInt::from(x_i % m_i) - BigInt::from(&acc_x % m_i);
        let t = (diff * BigInt::from(inv))
            .mod_floor(&BigInt::from(m_i.clone()))
            .to_biguint()
            .ok_or(RsaError::InvalidInput("floor reduction produced a negative value"))?;

        acc_x += &acc_m * t;
        acc_m *= m_i;
    }

    Ok(acc_x)
}

/// Greatest common divisor.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        assert_eq!(mod_pow(&big(3), &big(5), &big(7)).unwrap(), big(5));
        // 65^17 mod 3233 = 2790 (textbook RSA encryption)
        assert_eq!(mod_pow(&big(65), &big(17), &big(3233)).unwrap(), big(2790));
    }

    #[test]
    fn test_mod_pow_zero_exponent() {
        assert_eq!(mod_pow(&big(10), &big(0), &big(7)).unwrap(), big(1));
        assert_eq!(mod_pow(&big(0), &big(0), &big(2)).unwrap(), big(1));
    }

    #[test]
    fn test_mod_pow_unit_modulus() {
        assert_eq!(mod_pow(&big(10), &big(3), &big(1)).unwrap(), big(0));
        assert_eq!(mod_pow(&big(0), &big(0), &big(1)).unwrap(), big(0));
    }

    #[test]
    fn test_mod_pow_zero_modulus() {
        assert_eq!(
            mod_pow(&big(2), &big(3), &big(0)),
            Err(RsaError::InvalidInput("zero modulus"))
        );
    }

    #[test]
    fn test_extended_gcd() {
        let (g, x, y) = extended_gcd(&BigInt::from(240), &BigInt::from(46));
        assert_eq!(g, BigInt::from(2));
        assert_eq!(BigInt::from(240) * &x + BigInt::from(46) * &y, g);
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7
        let inv = mod_inverse(&big(3), &big(7)).unwrap();
        assert_eq!(inv, big(5));
        assert_eq!((big(3) * inv) % big(7), big(1));

        // textbook RSA: 17^(-1) mod 3120 = 2753
        assert_eq!(mod_inverse(&big(17), &big(3120)).unwrap(), big(2753));
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        assert_eq!(mod_inverse(&big(4), &big(8)), Err(RsaError::NoInverse));
        assert_eq!(mod_inverse(&big(6), &big(9)), Err(RsaError::NoInverse));
    }

    #[test]
    fn test_mod_inverse_zero_modulus() {
        assert_eq!(
            mod_inverse(&big(3), &big(0)),
            Err(RsaError::InvalidInput("zero modulus"))
        );
    }

    #[test]
    fn test_crt_combine_two_terms() {
        // x ≡ 2 mod 3, x ≡ 3 mod 5 -> x = 8 mod 15
        let x = crt_combine(&[(big(3), big(2)), (big(5), big(3))]).unwrap();
        assert_eq!(x, big(8));
    }

    #[test]
    fn test_crt_combine_three_terms() {
        // Sun Tzu's classic: x ≡ 2 mod 3, 3 mod 5, 2 mod 7 -> 23 mod 105
        let x = crt_combine(&[(big(3), big(2)), (big(5), big(3)), (big(7), big(2))]).unwrap();
        assert_eq!(x, big(23));
    }

    #[test]
    fn test_crt_combine_unreduced_residues() {
        // residues larger than their modulus are reduced first
        let x = crt_combine(&[(big(3), big(5)), (big(5), big(8))]).unwrap();
        assert_eq!(x, big(8));
    }

    #[test]
    fn test_crt_combine_rejects_non_coprime() {
        assert_eq!(
            crt_combine(&[(big(6), big(1)), (big(4), big(3))]),
            Err(RsaError::InvalidInput("CRT moduli are not pairwise coprime"))
        );
        // duplicated modulus, the p == q failure mode
        assert_eq!(
            crt_combine(&[(big(5), big(1)), (big(5), big(2))]),
            Err(RsaError::InvalidInput("CRT moduli are not pairwise coprime"))
        );
    }

    #[test]
    fn test_crt_combine_rejects_empty_and_zero() {
        assert_eq!(
            crt_combine(&[]),
            Err(RsaError::InvalidInput("empty residue set"))
        );
        assert_eq!(
            crt_combine(&[(big(0), big(0))]),
            Err(RsaError::InvalidInput("zero CRT modulus"))
        );
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&big(48), &big(18)), big(6));
        assert_eq!(gcd(&big(17), &big(3120)), big(1));
    }
}
