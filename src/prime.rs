// Primality Testing and Secure Prime Generation
// Miller-Rabin over num-bigint, fed by an injected cryptographic RNG

use crate::arith::mod_pow_nonzero;
use crate::error::RsaError;
use crate::keygen::PrimePair;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

/// Default Miller-Rabin round count for cryptographic use.
/// Bounds the false-positive probability by 4^(-20).
pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 20;

/// Candidate tests allowed per requested bit of prime size. The expected
/// number of odd candidates before a hit is roughly 0.35 * bits, so this cap
/// only fires when the randomness source is broken.
const PRIME_SEARCH_CAP_PER_BIT: u64 = 128;

/// Redraws allowed when the second prime collides with the first. Collisions
/// are vanishingly rare at cryptographic sizes, so hitting this bound means
/// the search space or the randomness source is degenerate.
const PRIME_PAIR_REDRAW_ATTEMPTS: u32 = 64;

/// Trial-division table. Catches small composites (and small pseudoprimes
/// such as 341 = 11 * 31) before any witness is drawn.
const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Miller-Rabin probabilistic primality test.
///
/// Rejects n < 2 and even n > 2 outright, then trial-divides by
/// `SMALL_PRIMES`, then runs `rounds` independent random witnesses drawn
/// from [2, n-2]. Returns false as soon as a witness proves compositeness;
/// a true result is wrong with probability at most 4^(-rounds).
pub fn is_probably_prime<R: RngCore + CryptoRng>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let two = BigUint::from(2u8);
    if n < &two {
        return false;
    }

    for small in SMALL_PRIMES {
        let small = BigUint::from(small);
        if n == &small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // Witness loop
    'witness: for _ in 0..rounds {
        // random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow_nonzero(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue 'witness;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // no non-trivial square root of unity found: composite
        return false;
    }

    true
}

/// Generate a random prime of exactly `bit_length` bits.
///
/// Draws a random odd candidate with the top bit forced, and on a failed
/// primality test advances by 2 (staying odd) rather than redrawing; a fresh
/// draw happens only when the advance carries past the requested bit length.
/// The total number of candidates tested is capped, so a broken randomness
/// source surfaces as `PrimeSearchExhausted` instead of an endless loop.
pub fn generate_prime<R: RngCore + CryptoRng>(
    bit_length: u64,
    rounds: u32,
    rng: &mut R,
) -> Result<BigUint, RsaError> {
    if bit_length < 2 {
        return Err(RsaError::InvalidInput("prime bit length must be at least 2"));
    }

    let cap = PRIME_SEARCH_CAP_PER_BIT.saturating_mul(bit_length);
    let mut candidate = random_odd(bit_length, rng);

    for _ in 0..cap {
        if is_probably_prime(&candidate, rounds, rng) {
            return Ok(candidate);
        }
        candidate += 2u8;
        if candidate.bits() > bit_length {
            candidate = random_odd(bit_length, rng);
        }
    }

    Err(RsaError::PrimeSearchExhausted)
}

/// Generate a pair of distinct primes of the same bit length.
///
/// Both draws come from the same distribution, so `p == q` is possible and
/// handled by guaranteed redraw, not probabilistic hope. Each redraw is a
/// full capped search, and the redraws themselves are capped too: a search
/// space too small to hold two distinct primes (or a randomness source stuck
/// on one value) surfaces as `PrimeSearchExhausted` instead of spinning.
pub fn generate_prime_pair<R: RngCore + CryptoRng>(
    bit_length: u64,
    rounds: u32,
    rng: &mut R,
) -> Result<PrimePair, RsaError> {
    let p = generate_prime(bit_length, rounds, rng)?;
    for _ in 0..PRIME_PAIR_REDRAW_ATTEMPTS {
        let q = generate_prime(bit_length, rounds, rng)?;
        if q != p {
            return Ok(PrimePair { p, q });
        }
    }
    Err(RsaError::PrimeSearchExhausted)
}

/// Random integer of exactly `bits` bits, forced odd.
fn random_odd<R: RngCore + CryptoRng>(bits: u64, rng: &mut R) -> BigUint {
    let mut candidate = rng.gen_biguint(bits);
    candidate.set_bit(bits - 1, true);
    candidate.set_bit(0, true);
    candidate
}
