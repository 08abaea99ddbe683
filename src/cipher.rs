// RSA Encryption and Decryption
// Encryption is a single modular exponentiation; decryption comes in a
// CRT-accelerated path (two half-size exponentiations, recombined) and a
// direct fallback for when the prime factors are not retained

use crate::arith::{crt_combine, mod_pow};
use crate::error::RsaError;
use crate::keygen::{PrimePair, PublicKey};
use num_bigint::BigUint;
use num_traits::One;

/// Encrypt a plaintext integer: c = m^e mod n.
/// Fails with `PlaintextTooLarge` when m >= n; the plaintext is never
/// truncated to fit.
pub fn encrypt(plaintext: &BigUint, public_key: &PublicKey) -> Result<BigUint, RsaError> {
    if plaintext >= &public_key.n {
        return Err(RsaError::PlaintextTooLarge);
    }
    mod_pow(plaintext, &public_key.e, &public_key.n)
}

/// Decrypt via the Chinese Remainder Theorem.
///
/// Computes d_p = d mod (p-1) and d_q = d mod (q-1), exponentiates the
/// ciphertext separately modulo p and q, and recombines. Each
/// sub-exponentiation works on half-size numbers, roughly a 4x win over the
/// direct path. Produces the same result as `decrypt_direct` for the same
/// key material. `p == q` surfaces as `InvalidInput` from the recombination.
pub fn decrypt(ciphertext: &BigUint, primes: &PrimePair, d: &BigUint) -> Result<BigUint, RsaError> {
    let (p, q) = (&primes.p, &primes.q);
    if p <= &BigUint::one() || q <= &BigUint::one() {
        return Err(RsaError::InvalidInput("prime factors must exceed 1"));
    }

    let d_p = d % (p - 1u8);
    let d_q = d % (q - 1u8);
    let x_p = mod_pow(&(ciphertext % p), &d_p, p)?;
    let x_q = mod_pow(&(ciphertext % q), &d_q, q)?;

    crt_combine(&[(p.clone(), x_p), (q.clone(), x_q)])
}

/// Decrypt without the prime factorization: m = c^d mod n.
/// Slower than `decrypt` but needs only the public modulus and the private
/// exponent.
pub fn decrypt_direct(ciphertext: &BigUint, n: &BigUint, d: &BigUint) -> Result<BigUint, RsaError> {
    mod_pow(ciphertext, d, n)
}
