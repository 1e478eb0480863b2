/// Default modulus size in bits; matches the original 1024-bit deployment.
pub const DEFAULT_MODULUS_BITS: u64 = 1024;

/// Smallest modulus the key generator accepts unless the caller lowers it.
pub const MIN_MODULUS_BITS: u64 = 512;

/// Conventional public exponent, F4 = 2^16 + 1.
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

/// Miller-Rabin rounds; false-positive probability at most 4^-20.
pub const DEFAULT_ROUNDS: u32 = 20;

/// Wall-clock budget per prime draw, in milliseconds.
pub const DEFAULT_TIME_MAX_MS: i64 = 60_000;

/// Attempts at a usable prime pair (distinct primes, exponent coprime with
/// the totient) before key generation gives up.
pub const MAX_KEYGEN_ATTEMPTS: u32 = 16;

/// File names the generator writes below the key directory.
pub const PUBLIC_KEY_FILE: &str = "public.key";
pub const PRIVATE_KEY_FILE: &str = "private.key";

/// Default ciphertext output path for the encrypt command.
pub const DEFAULT_CIPHERTEXT_FILE: &str = "ciphertext.asc";
