use std::fs;
use std::path::Path;

use num_bigint::{BigInt, Sign};
use num_traits::Signed;

use crate::rsa::codec;
use crate::rsa::error::Error;
use crate::rsa::keys::armor::{read_armor, write_armor};
use crate::rsa::keys::{KeyError, PrivateKey, PublicKey};
use crate::rsa::math::mod_exp;

const CIPHERTEXT_LABEL: &str = "RSA CIPHERTEXT";

/// A single encrypted block: an integer in `[0, modulus)`. Persists as an
/// armored file holding the little-endian value bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    pub value: BigInt,
}

impl Ciphertext {
    pub fn save(&self, path: &Path) -> Result<(), KeyError> {
        let payload = self.value.to_bytes_le().1;
        fs::write(path, write_armor(CIPHERTEXT_LABEL, &payload))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, KeyError> {
        let text = fs::read_to_string(path)?;
        let (label, payload) = read_armor(&text)?;
        if label != CIPHERTEXT_LABEL {
            return Err(KeyError::Parse(format!(
                "expected {} armor, found {}",
                CIPHERTEXT_LABEL, label
            )));
        }
        Ok(Self {
            value: BigInt::from_bytes_le(Sign::Plus, &payload),
        })
    }
}

/// Encrypts a message under a public key: `c = m^e mod n`, where `m` is the
/// codec encoding of the message.
pub fn encrypt(key: &PublicKey, message: &str) -> Result<Ciphertext, Error> {
    let m = codec::encode_message(message, &key.modulus)?;
    Ok(Ciphertext {
        value: mod_exp(&m, &key.exponent, &key.modulus),
    })
}

/// Decrypts a ciphertext under a private key: `m = c^d mod n`, decoded back
/// to text. A ciphertext outside `[0, modulus)` never came from a matching
/// encryption and is reported instead of being reduced silently.
pub fn decrypt(key: &PrivateKey, ciphertext: &Ciphertext) -> Result<String, Error> {
    if ciphertext.value.is_negative() || ciphertext.value >= key.modulus {
        return Err(Error::RangeError(format!(
            "ciphertext does not lie in [0, modulus): {} bits against a {}-bit modulus",
            ciphertext.value.bits(),
            key.modulus.bits()
        )));
    }
    let m = mod_exp(&ciphertext.value, &key.exponent, &key.modulus);
    codec::decode_message(&m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::keygen::KeyGenerator;

    fn textbook_keys() -> (PublicKey, PrivateKey) {
        let n = BigInt::from(3233);
        (
            PublicKey {
                modulus: n.clone(),
                exponent: BigInt::from(17),
            },
            PrivateKey {
                modulus: n,
                exponent: BigInt::from(2753),
            },
        )
    }

    #[test]
    fn classic_vector_encrypts_as_expected() {
        let (public, private) = textbook_keys();
        // "A" encodes to 65 and 65^17 mod 3233 = 2790.
        let ciphertext = encrypt(&public, "A").unwrap();
        assert_eq!(ciphertext.value, BigInt::from(2790));
        assert_eq!(decrypt(&private, &ciphertext).unwrap(), "A");
    }

    #[test]
    fn round_trips_under_generated_keys() {
        let generator = KeyGenerator {
            min_modulus_bits: 16,
            ..KeyGenerator::new(128)
        };
        let pair = generator.generate().unwrap();
        for message in ["x", "Attack at dawn", "12 bytes max"] {
            let ciphertext = encrypt(&pair.public, message).unwrap();
            assert_eq!(decrypt(&pair.private, &ciphertext).unwrap(), message);
        }
    }

    #[test]
    fn oversized_message_is_reported() {
        let (public, _) = textbook_keys();
        assert!(matches!(
            encrypt(&public, "much too long for a 12-bit modulus"),
            Err(Error::EncodingTooLarge { .. })
        ));
    }

    #[test]
    fn out_of_range_ciphertext_is_reported() {
        let (_, private) = textbook_keys();
        let corrupted = Ciphertext {
            value: BigInt::from(3233),
        };
        assert!(matches!(
            decrypt(&private, &corrupted),
            Err(Error::RangeError(_))
        ));
        let negative = Ciphertext {
            value: BigInt::from(-1),
        };
        assert!(matches!(
            decrypt(&private, &negative),
            Err(Error::RangeError(_))
        ));
    }

    #[test]
    fn ciphertext_survives_the_filesystem() {
        let (public, private) = textbook_keys();
        let ciphertext = encrypt(&public, "A").unwrap();
        let path = std::env::temp_dir().join(format!("rsa-cli-ct-{}.asc", std::process::id()));
        ciphertext.save(&path).unwrap();
        let loaded = Ciphertext::load(&path).unwrap();
        assert_eq!(loaded, ciphertext);
        assert_eq!(decrypt(&private, &loaded).unwrap(), "A");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn key_armor_is_not_a_ciphertext() {
        let (public, _) = textbook_keys();
        let path = std::env::temp_dir().join(format!("rsa-cli-mix-{}.key", std::process::id()));
        public.save(&path, "").unwrap();
        assert!(matches!(Ciphertext::load(&path), Err(KeyError::Parse(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
