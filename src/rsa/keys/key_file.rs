//! On-disk key format. The armored payload is laid out as:
//!
//! ```text
//! u32 le  exponent byte length
//! u32 le  modulus byte length
//! bytes   exponent, little-endian
//! bytes   modulus, little-endian
//! 8 bytes kind tag, "public" or "private", NUL-padded
//! bytes   comment, UTF-8, to end of payload
//! ```
//!
//! The kind tag, not the armor fence, decides whether a file holds a
//! public or a private key; loading the wrong kind is an error.

use std::fs;
use std::path::{Path, PathBuf};

use num_bigint::{BigInt, Sign};

use crate::rsa::config::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::rsa::keys::armor::{read_armor, write_armor};
use crate::rsa::keys::{KeyError, KeyKind, KeyPair, PrivateKey, PublicKey};

const KIND_TAG_LEN: usize = 8;
const HEADER_LEN: usize = 8;

fn kind_tag(kind: KeyKind) -> [u8; KIND_TAG_LEN] {
    let mut tag = [0u8; KIND_TAG_LEN];
    for (slot, byte) in tag.iter_mut().zip(kind.to_string().bytes()) {
        *slot = byte;
    }
    tag
}

fn parse_kind(tag: &[u8]) -> Result<KeyKind, KeyError> {
    let text: Vec<u8> = tag.iter().take_while(|byte| **byte != 0).cloned().collect();
    match text.as_slice() {
        b"public" => Ok(KeyKind::Public),
        b"private" => Ok(KeyKind::Private),
        _ => Err(KeyError::Parse("unknown key kind tag".to_string())),
    }
}

fn armor_label(kind: KeyKind, modulus: &BigInt) -> String {
    format!(
        "RSA-{} {} KEY",
        modulus.bits(),
        kind.to_string().to_uppercase()
    )
}

fn pack(kind: KeyKind, exponent: &BigInt, modulus: &BigInt, comment: &str) -> Vec<u8> {
    let exponent = exponent.to_bytes_le().1;
    let modulus = modulus.to_bytes_le().1;
    let mut payload =
        Vec::with_capacity(HEADER_LEN + exponent.len() + modulus.len() + KIND_TAG_LEN + comment.len());
    payload.extend_from_slice(&(exponent.len() as u32).to_le_bytes());
    payload.extend_from_slice(&(modulus.len() as u32).to_le_bytes());
    payload.extend_from_slice(&exponent);
    payload.extend_from_slice(&modulus);
    payload.extend_from_slice(&kind_tag(kind));
    payload.extend_from_slice(comment.as_bytes());
    payload
}

struct Unpacked {
    kind: KeyKind,
    exponent: BigInt,
    modulus: BigInt,
    #[allow(dead_code)]
    comment: String,
}

fn unpack(payload: &[u8]) -> Result<Unpacked, KeyError> {
    if payload.len() < HEADER_LEN {
        return Err(KeyError::Parse("payload shorter than its header".to_string()));
    }
    let mut len = [0u8; 4];
    len.copy_from_slice(&payload[0..4]);
    let exponent_len = u32::from_le_bytes(len) as usize;
    len.copy_from_slice(&payload[4..8]);
    let modulus_len = u32::from_le_bytes(len) as usize;
    let tag_start = HEADER_LEN + exponent_len + modulus_len;
    if payload.len() < tag_start + KIND_TAG_LEN {
        return Err(KeyError::Parse("payload truncated".to_string()));
    }
    let exponent = BigInt::from_bytes_le(Sign::Plus, &payload[HEADER_LEN..HEADER_LEN + exponent_len]);
    let modulus = BigInt::from_bytes_le(Sign::Plus, &payload[HEADER_LEN + exponent_len..tag_start]);
    let kind = parse_kind(&payload[tag_start..tag_start + KIND_TAG_LEN])?;
    let comment = String::from_utf8(payload[tag_start + KIND_TAG_LEN..].to_vec())
        .map_err(|_| KeyError::Parse("comment is not valid UTF-8".to_string()))?;
    Ok(Unpacked {
        kind,
        exponent,
        modulus,
        comment,
    })
}

fn load_kind(path: &Path, expected: KeyKind) -> Result<Unpacked, KeyError> {
    let text = fs::read_to_string(path)?;
    let (_, payload) = read_armor(&text)?;
    let unpacked = unpack(&payload)?;
    if unpacked.kind != expected {
        return Err(KeyError::WrongKind {
            expected,
            found: unpacked.kind,
        });
    }
    Ok(unpacked)
}

impl PublicKey {
    pub fn save(&self, path: &Path, comment: &str) -> Result<(), KeyError> {
        let payload = pack(KeyKind::Public, &self.exponent, &self.modulus, comment);
        fs::write(path, write_armor(&armor_label(KeyKind::Public, &self.modulus), &payload))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, KeyError> {
        let unpacked = load_kind(path, KeyKind::Public)?;
        Ok(Self {
            modulus: unpacked.modulus,
            exponent: unpacked.exponent,
        })
    }
}

impl PrivateKey {
    pub fn save(&self, path: &Path, comment: &str) -> Result<(), KeyError> {
        let payload = pack(KeyKind::Private, &self.exponent, &self.modulus, comment);
        fs::write(path, write_armor(&armor_label(KeyKind::Private, &self.modulus), &payload))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, KeyError> {
        let unpacked = load_kind(path, KeyKind::Private)?;
        Ok(Self {
            modulus: unpacked.modulus,
            exponent: unpacked.exponent,
        })
    }
}

impl KeyPair {
    /// Writes `public.key` and `private.key` below `dir`, creating the
    /// directory if needed. Emission is all-or-nothing: both files are
    /// rendered before either is written, and a failed second write removes
    /// the first.
    pub fn save(&self, dir: &Path, comment: &str) -> Result<(PathBuf, PathBuf), KeyError> {
        fs::create_dir_all(dir)?;
        let public_path = dir.join(PUBLIC_KEY_FILE);
        let private_path = dir.join(PRIVATE_KEY_FILE);
        let public_text = write_armor(
            &armor_label(KeyKind::Public, &self.public.modulus),
            &pack(KeyKind::Public, &self.public.exponent, &self.public.modulus, comment),
        );
        let private_text = write_armor(
            &armor_label(KeyKind::Private, &self.private.modulus),
            &pack(KeyKind::Private, &self.private.exponent, &self.private.modulus, comment),
        );
        fs::write(&public_path, public_text)?;
        if let Err(err) = fs::write(&private_path, private_text) {
            let _ = fs::remove_file(&public_path);
            return Err(err.into());
        }
        Ok((public_path, private_path))
    }
}
