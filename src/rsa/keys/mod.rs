pub mod armor;
pub mod key_file;

use std::fmt;

use num_bigint::BigInt;
use thiserror::Error;

/// Encryption half of a pair: the modulus and the public exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub modulus: BigInt,
    pub exponent: BigInt,
}

/// Decryption half of a pair: the same modulus and the private exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub modulus: BigInt,
    pub exponent: BigInt,
}

/// Both halves derived from one prime pair. The primes themselves are
/// dropped at derivation time and never stored.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Public => write!(f, "public"),
            KeyKind::Private => write!(f, "private"),
        }
    }
}

/// Failures at the key store boundary: reading, writing, and parsing the
/// armored files.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed file: {0}")]
    Parse(String),

    #[error("not an armored rsa file")]
    Format,

    #[error("expected a {expected} key, found a {found} key")]
    WrongKind { expected: KeyKind, found: KeyKind },
}
