use std::string::FromUtf8Error;
use thiserror::Error;

/// Failures reported by the RSA engine itself. I/O and key-file parse
/// problems live in [`crate::rsa::keys::KeyError`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("key generation failed: {0}")]
    GenerationFailure(String),

    /// A message or ciphertext integer fell outside `[0, modulus)`.
    #[error("value out of range: {0}")]
    RangeError(String),

    /// The plaintext encodes to an integer at least as large as the
    /// modulus. Textbook RSA handles a single block; there is no
    /// chunking, so the caller must use a shorter message or a bigger key.
    #[error("message too long for this key size: the message needs {message_bits} bits but the modulus provides {modulus_bits}")]
    EncodingTooLarge { message_bits: u64, modulus_bits: u64 },

    /// A decrypted integer does not decode to valid UTF-8 text. Usually
    /// means the ciphertext was produced under a different key, or was
    /// corrupted in storage.
    #[error("decrypted data is not valid UTF-8 text (wrong key or corrupted ciphertext?)")]
    DecodingError(#[from] FromUtf8Error),
}
