use std::thread;

use chrono::Local;
use crossbeam_channel::bounded;
use lazy_static::lazy_static;
use num_bigint::{BigInt, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;

use crate::rsa::error::Error;
use crate::rsa::math::mod_exp;

lazy_static! {
    /// Primes below 1000, used for trial division before the probabilistic rounds.
    static ref SMALL_PRIMES: Vec<u32> = {
        const LIMIT: usize = 1000;
        let mut composite = vec![false; LIMIT];
        let mut primes = Vec::new();
        for i in 2..LIMIT {
            if !composite[i] {
                primes.push(i as u32);
                let mut j = i * i;
                while j < LIMIT {
                    composite[j] = true;
                    j += i;
                }
            }
        }
        primes
    };
}

/// Miller-Rabin probabilistic primality test.
///
/// Declares `n` "probably prime" with a false-positive probability of at
/// most `4^-rounds`; [`crate::rsa::config::DEFAULT_ROUNDS`] is the default
/// used by the CLI. Composites with a factor below 1000 are rejected by
/// trial division without running any round.
pub fn miller_rabin(n: &BigInt, rounds: u32) -> bool {
    let two = BigInt::from(2);
    if n < &two {
        return false;
    }
    for &small in SMALL_PRIMES.iter() {
        let small = BigInt::from(small);
        if *n == small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }
    // n is odd here, so n - 1 = 2^s * d with s >= 1 and d odd.
    let n_minus_one = n - BigInt::one();
    let mut d = n_minus_one.clone();
    let mut s = 0u64;
    while !d.bit(0) {
        d >>= 1;
        s += 1;
    }
    let mut rng = rand::thread_rng();
    'witness: for _ in 0..rounds {
        let a = rng.gen_bigint_range(&two, &n_minus_one);
        let mut x = mod_exp(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Searches random odd candidates for primes of an exact bit length.
///
/// Each draw comes from `rand::thread_rng()`, a ChaCha-based CSPRNG, with
/// the top bit forced so the result has exactly `bits` significant bits
/// and the bottom bit forced so it is odd. A batch of worker threads races
/// per draw; surplus finds are kept on the instance for the next call.
pub struct PrimeGenerator {
    pub bits: u64,
    pub rounds: u32,
    pub threads: usize,
    /// Wall-clock budget per worker; lapsing it fails the draw instead of
    /// spinning forever on degenerate inputs.
    pub time_max_ms: i64,
    cache: Vec<BigInt>,
}

impl PrimeGenerator {
    pub fn new(bits: u64, rounds: u32, threads: usize, time_max_ms: i64) -> Result<Self, Error> {
        if bits < 2 {
            return Err(Error::InvalidParameter(format!(
                "prime bit length must be at least 2, got {}",
                bits
            )));
        }
        Ok(Self {
            bits,
            rounds,
            threads: threads.max(1),
            time_max_ms,
            cache: Vec::new(),
        })
    }

    pub fn generate(&mut self) -> Result<BigInt, Error> {
        if let Some(prime) = self.cache.pop() {
            return Ok(prime);
        }
        let (tx, rx) = bounded(self.threads);
        let handles = (0..self.threads)
            .map(|_| {
                let tx = tx.clone();
                let (bits, rounds, time_max_ms) = (self.bits, self.rounds, self.time_max_ms);
                thread::spawn(move || {
                    let _ = tx.send(search_prime(bits, rounds, time_max_ms));
                })
            })
            .collect::<Vec<_>>();
        drop(tx);
        let mut failure = None;
        for result in rx {
            match result {
                Ok(prime) => self.cache.push(prime),
                Err(err) => failure = Some(err),
            }
        }
        for handle in handles {
            if handle.join().is_err() {
                failure = Some(Error::GenerationFailure(
                    "prime search worker panicked".to_string(),
                ));
            }
        }
        match self.cache.pop() {
            Some(prime) => Ok(prime),
            None => Err(failure.unwrap_or_else(|| {
                Error::GenerationFailure("prime search produced no candidates".to_string())
            })),
        }
    }
}

fn search_prime(bits: u64, rounds: u32, time_max_ms: i64) -> Result<BigInt, Error> {
    let mut rng = rand::thread_rng();
    let start = Local::now().timestamp_millis();
    loop {
        let candidate = draw_candidate(&mut rng, bits);
        if miller_rabin(&candidate, rounds) {
            return Ok(candidate);
        }
        let elapsed = Local::now().timestamp_millis() - start;
        if elapsed > time_max_ms {
            return Err(Error::GenerationFailure(format!(
                "no {}-bit prime found within {} ms",
                bits, time_max_ms
            )));
        }
    }
}

fn draw_candidate<R: Rng + ?Sized>(rng: &mut R, bits: u64) -> BigInt {
    let mut candidate = rng.gen_biguint(bits);
    candidate.set_bit(bits - 1, true);
    candidate.set_bit(0, true);
    BigInt::from(candidate)
}
