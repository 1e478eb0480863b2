//! Text armor for keys and ciphertexts: BEGIN/END fences around a base64
//! payload, folded at 70 columns.

use crate::rsa::keys::KeyError;

const LINE_WIDTH: usize = 70;

pub(crate) fn write_armor(label: &str, payload: &[u8]) -> String {
    let encoded = base64::encode(payload);
    let mut out = format!("-----BEGIN {}-----\n", label);
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str(&format!("-----END {}-----\n", label));
    out
}

/// Parses armored text back into its label and payload. Lines outside the
/// fences are ignored; the payload may be folded at any width.
pub(crate) fn read_armor(text: &str) -> Result<(String, Vec<u8>), KeyError> {
    let mut label = None;
    let mut body = String::new();
    let mut in_body = false;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(found) = line
            .strip_prefix("-----BEGIN ")
            .and_then(|rest| rest.strip_suffix("-----"))
        {
            label = Some(found.to_string());
            in_body = true;
        } else if line.starts_with("-----END ") {
            in_body = false;
        } else if in_body {
            body.push_str(line);
        }
    }
    let label = label.ok_or(KeyError::Format)?;
    let payload = base64::decode(&body)
        .map_err(|err| KeyError::Parse(format!("bad base64 payload: {}", err)))?;
    Ok((label, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_binary_payloads() {
        let payload: Vec<u8> = (0u8..=255).collect();
        let text = write_armor("RSA-2048 PUBLIC KEY", &payload);
        assert!(text.starts_with("-----BEGIN RSA-2048 PUBLIC KEY-----\n"));
        assert!(text.ends_with("-----END RSA-2048 PUBLIC KEY-----\n"));
        assert!(text.lines().all(|line| line.len() <= 70));
        let (label, decoded) = read_armor(&text).unwrap();
        assert_eq!(label, "RSA-2048 PUBLIC KEY");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn rejects_unfenced_text() {
        assert!(matches!(read_armor("just some text"), Err(KeyError::Format)));
    }

    #[test]
    fn rejects_corrupted_base64() {
        let text = "-----BEGIN RSA CIPHERTEXT-----\n!!!not base64!!!\n-----END RSA CIPHERTEXT-----\n";
        assert!(matches!(read_armor(text), Err(KeyError::Parse(_))));
    }
}
