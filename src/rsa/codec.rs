use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::rsa::error::Error;

/// Maps UTF-8 text into the integer domain RSA operates on: the bytes are
/// base-256 digits, most significant first. The empty message maps to zero.
///
/// The encoding must come out strictly below the modulus; this is a
/// correctness boundary of single-block textbook RSA, not a soft limit, so
/// oversized messages are rejected rather than truncated or chunked. A
/// message starting with a NUL byte is rejected as well: base-256 has no
/// leading zero digit, so such a message could never round-trip.
pub fn encode_message(message: &str, modulus: &BigInt) -> Result<BigInt, Error> {
    let bytes = message.as_bytes();
    if bytes.first() == Some(&0) {
        return Err(Error::InvalidParameter(
            "message starts with a NUL byte, which the base-256 encoding cannot represent"
                .to_string(),
        ));
    }
    let value = BigInt::from_bytes_be(Sign::Plus, bytes);
    if &value >= modulus {
        return Err(Error::EncodingTooLarge {
            message_bits: value.bits(),
            modulus_bits: modulus.bits(),
        });
    }
    Ok(value)
}

/// Inverse mapping: integer back to UTF-8 text. Zero decodes to the empty
/// string; bytes that are not valid UTF-8 signal a wrong key or corrupted
/// ciphertext.
pub fn decode_message(value: &BigInt) -> Result<String, Error> {
    if value.is_zero() {
        return Ok(String::new());
    }
    let (_, bytes) = value.to_bytes_be();
    Ok(String::from_utf8(bytes)?)
}
