use num::Integer;
use num_bigint::BigInt;
use num_traits::One;

use crate::rsa::config::{
    DEFAULT_PUBLIC_EXPONENT, DEFAULT_ROUNDS, DEFAULT_TIME_MAX_MS, MAX_KEYGEN_ATTEMPTS,
    MIN_MODULUS_BITS,
};
use crate::rsa::error::Error;
use crate::rsa::keys::{KeyPair, PrivateKey, PublicKey};
use crate::rsa::math::{euler_totient, mod_inverse};
use crate::rsa::prime_gen::PrimeGenerator;

/// Derives a key pair from two freshly drawn primes of `modulus_bits / 2`
/// bits each. The public exponent defaults to 65537; a prime pair whose
/// totient shares a factor with it is redrawn, as is an equal pair, up to
/// [`MAX_KEYGEN_ATTEMPTS`] times.
pub struct KeyGenerator {
    pub modulus_bits: u64,
    pub public_exponent: BigInt,
    pub rounds: u32,
    pub threads: usize,
    pub time_max_ms: i64,
    /// Lower bound on `modulus_bits`. Defaults to 512; tests shrink it to
    /// keep runtimes short.
    pub min_modulus_bits: u64,
}

/// Generation-time intermediates, exposed crate-internally so tests can
/// check key consistency. Dropped immediately by the public path.
pub(crate) struct KeyMaterial {
    pub p: BigInt,
    pub q: BigInt,
    pub phi: BigInt,
}

impl KeyGenerator {
    pub fn new(modulus_bits: u64) -> Self {
        Self {
            modulus_bits,
            public_exponent: BigInt::from(DEFAULT_PUBLIC_EXPONENT),
            rounds: DEFAULT_ROUNDS,
            threads: num_cpus::get(),
            time_max_ms: DEFAULT_TIME_MAX_MS,
            min_modulus_bits: MIN_MODULUS_BITS,
        }
    }

    pub fn generate(&self) -> Result<KeyPair, Error> {
        self.generate_with_material().map(|(pair, _)| pair)
    }

    pub(crate) fn generate_with_material(&self) -> Result<(KeyPair, KeyMaterial), Error> {
        if self.modulus_bits < self.min_modulus_bits {
            return Err(Error::InvalidParameter(format!(
                "modulus must be at least {} bits, got {}",
                self.min_modulus_bits, self.modulus_bits
            )));
        }
        if self.modulus_bits % 2 != 0 {
            return Err(Error::InvalidParameter(format!(
                "modulus bit length must be even, got {}",
                self.modulus_bits
            )));
        }
        let mut primes = PrimeGenerator::new(
            self.modulus_bits / 2,
            self.rounds,
            self.threads,
            self.time_max_ms,
        )?;
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let p = primes.generate()?;
            let q = primes.generate()?;
            // Equal primes would collapse the factorization of the modulus.
            if p == q {
                continue;
            }
            let phi = euler_totient(&p, &q);
            if !phi.gcd(&self.public_exponent).is_one() {
                continue;
            }
            let n = &p * &q;
            let d = mod_inverse(&self.public_exponent, &phi).ok_or_else(|| {
                Error::GenerationFailure(
                    "public exponent has no inverse modulo the totient".to_string(),
                )
            })?;
            let pair = KeyPair {
                public: PublicKey {
                    modulus: n.clone(),
                    exponent: self.public_exponent.clone(),
                },
                private: PrivateKey {
                    modulus: n,
                    exponent: d,
                },
            };
            return Ok((pair, KeyMaterial { p, q, phi }));
        }
        Err(Error::GenerationFailure(format!(
            "no usable prime pair after {} attempts",
            MAX_KEYGEN_ATTEMPTS
        )))
    }
}
