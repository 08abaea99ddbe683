// RSA Error Taxonomy
// Every fallible operation in the crate reports one of these variants

use thiserror::Error;

/// Errors produced by the RSA core.
///
/// None of the messages embed key material: primes, the private exponent and
/// the totient must never travel through an error string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RsaError {
    /// The plaintext is not reducible modulo `n` without loss.
    #[error("plaintext must be strictly smaller than the modulus")]
    PlaintextTooLarge,

    /// `gcd(a, m) != 1`, so no modular inverse exists. During key generation
    /// this means `gcd(e, phi) != 1` and the caller should draw fresh primes.
    #[error("no modular inverse: operands are not coprime")]
    NoInverse,

    /// The bounded prime search ran out of candidates. This points at a
    /// broken or exhausted randomness source and is not retried internally.
    #[error("prime search exceeded its iteration bound; check the randomness source")]
    PrimeSearchExhausted,

    /// Malformed arguments: zero modulus, empty residue set, non-coprime CRT
    /// moduli, undersized bit length.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
