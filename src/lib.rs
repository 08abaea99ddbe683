// RSA Core - Main module file
// Exports the arithmetic, primality, key generation and cipher surface
//
// All values crossing the API are arbitrary-precision non-negative integers
// (num-bigint BigUint); the crate performs no I/O, parsing or encoding.
// Every random-consuming operation takes an injected RNG bounded by
// `RngCore + CryptoRng`, so production callers pass `rand::rngs::OsRng` and
// tests pass a seeded `StdRng`.

pub mod arith;
pub mod cipher;
pub mod error;
pub mod keygen;
pub mod prime;

pub use arith::{crt_combine, extended_gcd, gcd, mod_inverse, mod_pow};
pub use cipher::{decrypt, decrypt_direct, encrypt};
pub use error::RsaError;
pub use keygen::{
    generate_default_key_pair, generate_key_pair, generate_key_pair_from_bytes, KeyPair, PrimePair,
    PrivateParameters, PublicKey, PUBLIC_EXPONENT,
};
pub use prime::{
    generate_prime, generate_prime_pair, is_probably_prime, DEFAULT_MILLER_RABIN_ROUNDS,
};
