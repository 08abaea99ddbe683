// RSA Key Generation
// Derives the (PrimePair, PublicKey, PrivateParameters) triple from two
// freshly generated primes

use crate::arith::mod_inverse;
use crate::error::RsaError;
use crate::prime::{generate_prime_pair, DEFAULT_MILLER_RABIN_ROUNDS};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;

/// Fixed public exponent, chosen for efficient encryption and by convention.
pub const PUBLIC_EXPONENT: u32 = 65537;

/// Two distinct probable primes of equal bit length. Secret material.
#[derive(Clone, PartialEq, Eq)]
pub struct PrimePair {
    pub p: BigUint,
    pub q: BigUint,
}

/// RSA public key: modulus n = p * q and exponent e. Safe to expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

/// Private key material: totient phi = (p-1)(q-1) and exponent
/// d = e^(-1) mod phi. Secret.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateParameters {
    pub phi: BigUint,
    pub d: BigUint,
}

/// Everything one key-generation call produces. Immutable after
/// construction; regeneration builds entirely new instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub primes: PrimePair,
    pub public: PublicKey,
    pub private: PrivateParameters,
}

// Secret-bearing types keep their values out of Debug output.
impl fmt::Debug for PrimePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimePair")
            .field("p", &"<secret>")
            .field("q", &"<secret>")
            .finish()
    }
}

impl fmt::Debug for PrivateParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateParameters")
            .field("phi", &"<secret>")
            .field("d", &"<secret>")
            .finish()
    }
}

impl PublicKey {
    /// Bit length of the modulus.
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl KeyPair {
    /// Bit length of the modulus.
    pub fn bit_length(&self) -> u64 {
        self.public.bit_length()
    }
}

/// Generate an RSA key pair from two fresh `prime_bits`-bit primes.
///
/// `prime_bits` controls candidate prime size, so the modulus comes out at
/// roughly `2 * prime_bits` bits; it must be large enough for the caller's
/// security target (1024-bit primes for a 2048-bit modulus). `NoInverse`
/// propagates unchanged when `gcd(e, phi) != 1`; with e = 65537 that is
/// nearly impossible, and the right response is to call again for fresh
/// primes.
pub fn generate_key_pair<R: RngCore + CryptoRng>(
    prime_bits: u64,
    rounds: u32,
    rng: &mut R,
) -> Result<KeyPair, RsaError> {
    let primes = generate_prime_pair(prime_bits, rounds, rng)?;

    let n = &primes.p * &primes.q;
    let e = BigUint::from(PUBLIC_EXPONENT);
    let phi = (&primes.p - 1u8) * (&primes.q - 1u8);
    let d = mod_inverse(&e, &phi)?;

    Ok(KeyPair {
        primes,
        public: PublicKey { n, e },
        private: PrivateParameters { phi, d },
    })
}

/// Byte-length entry point: `prime_bytes`-byte primes, e.g. 128-byte primes
/// for a 2048-bit modulus.
pub fn generate_key_pair_from_bytes<R: RngCore + CryptoRng>(
    prime_bytes: u64,
    rounds: u32,
    rng: &mut R,
) -> Result<KeyPair, RsaError> {
    if prime_bytes == 0 {
        return Err(RsaError::InvalidInput("prime byte length must be positive"));
    }
    generate_key_pair(prime_bytes * 8, rounds, rng)
}

/// Generate a key pair with default settings: 1024-bit primes (2048-bit
/// modulus), 20 Miller-Rabin rounds, OS randomness.
pub fn generate_default_key_pair() -> Result<KeyPair, RsaError> {
    generate_key_pair(1024, DEFAULT_MILLER_RABIN_ROUNDS, &mut OsRng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_key_generation() {
        let mut rng = rng();
        let key = generate_key_pair(128, 20, &mut rng).unwrap();

        assert_ne!(key.primes.p, key.primes.q);
        assert_eq!(key.public.n, &key.primes.p * &key.primes.q);
        assert_eq!(key.public.e, BigUint::from(65537u32));
        assert_eq!(
            key.private.phi,
            (&key.primes.p - 1u8) * (&key.primes.q - 1u8)
        );
    }

    #[test]
    fn test_private_exponent_inverts_e() {
        let mut rng = rng();
        let key = generate_key_pair(128, 20, &mut rng).unwrap();

        // e * d ≡ 1 (mod phi)
        let product = &key.public.e * &key.private.d;
        assert!((product % &key.private.phi).is_one());
    }

    #[test]
    fn test_modulus_bit_length() {
        let mut rng = rng();
        let key = generate_key_pair(64, 20, &mut rng).unwrap();
        assert_eq!(key.primes.p.bits(), 64);
        assert_eq!(key.primes.q.bits(), 64);
        // top bit of each prime is forced, so n loses at most one bit
        assert!((127..=128).contains(&key.bit_length()));
    }

    #[test]
    fn test_byte_length_entry_point() {
        let mut rng = rng();
        let key = generate_key_pair_from_bytes(8, 20, &mut rng).unwrap();
        assert_eq!(key.primes.p.bits(), 64);

        assert_eq!(
            generate_key_pair_from_bytes(0, 20, &mut rng),
            Err(RsaError::InvalidInput("prime byte length must be positive"))
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut rng = rng();
        let key = generate_key_pair(64, 20, &mut rng).unwrap();

        let dump = format!("{:?} {:?}", key.primes, key.private);
        assert!(dump.contains("<secret>"));
        assert!(!dump.contains(&key.primes.p.to_string()));
        assert!(!dump.contains(&key.private.d.to_string()));
    }
}
