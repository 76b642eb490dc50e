//! canonical object encoding
//!
//! every object is stored as `"<kind> <payload length>\0"` followed by the
//! payload bytes. the object hash is SHA-1 over that whole byte sequence, so
//! identical content always maps to the identical hash.

use crate::error::{Error, Result};
use crate::hash::{Hash, Hasher};
use crate::object::{Kind, Object};

/// build the header for an object of `kind` with a payload of `len` bytes
pub fn header(kind: Kind, len: usize) -> Vec<u8> {
    format!("{} {}\0", kind, len).into_bytes()
}

/// compute the header and hash for a payload without copying it
pub fn encode(kind: Kind, payload: &[u8]) -> (Vec<u8>, Hash) {
    let header = header(kind, payload.len());

    let mut hasher = Hasher::new();
    hasher.update(&header);
    hasher.update(payload);

    (header, hasher.finalize())
}

/// decode full object bytes (header + payload)
///
/// the hash is always recomputed from `data`, never taken on trust.
pub fn decode(data: Vec<u8>) -> Result<Object> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::MalformedHeader("missing NUL after header".to_string()))?;

    let (kind, expected) = parse_header(&data[..nul])?;

    let actual = data.len() - nul - 1;
    if expected != actual {
        return Err(Error::SizeMismatch { expected, actual });
    }

    let hash = Hash::digest(&data);
    Ok(Object::from_parts(kind, hash, data, nul + 1))
}

fn parse_header(header: &[u8]) -> Result<(Kind, usize)> {
    let text = std::str::from_utf8(header)
        .map_err(|_| Error::MalformedHeader(String::from_utf8_lossy(header).into_owned()))?;

    let tokens: Vec<&str> = text.split(' ').collect();
    let [kind, len] = tokens[..] else {
        return Err(Error::MalformedHeader(text.to_string()));
    };

    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedHeader(text.to_string()));
    }
    let len: usize = len
        .parse()
        .map_err(|_| Error::MalformedHeader(text.to_string()))?;

    Ok((kind.parse()?, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &[u8] = b"Hello, World\n";
    const HELLO_HASH: &str = "3fa0d4b98289a95a7cd3a45c9545e622718f8d2b";

    #[test]
    fn test_header_format() {
        assert_eq!(header(Kind::Blob, 13), b"blob 13\0");
        assert_eq!(header(Kind::Tree, 0), b"tree 0\0");
        assert_eq!(header(Kind::Commit, 170), b"commit 170\0");
    }

    #[test]
    fn test_encode_known_blob() {
        let (header, hash) = encode(Kind::Blob, HELLO);
        assert_eq!(header, b"blob 13\0");
        assert_eq!(hash.to_hex(), HELLO_HASH);

        // determinism
        assert_eq!(encode(Kind::Blob, HELLO).1, hash);
    }

    #[test]
    fn test_encode_kind_changes_hash() {
        let (_, blob) = encode(Kind::Blob, b"same");
        let (_, commit) = encode(Kind::Commit, b"same");
        assert_ne!(blob, commit);
    }

    #[test]
    fn test_empty_blob_hash() {
        let (_, hash) = encode(Kind::Blob, b"");
        assert_eq!(hash.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
        assert!(!hash.is_zero());
    }

    #[test]
    fn test_decode_roundtrip() {
        let payloads: [&[u8]; 4] = [b"", HELLO, b"\0\0binary\0", &[0xff; 300]];
        for payload in payloads {
            let (header, hash) = encode(Kind::Blob, payload);
            let mut full = header;
            full.extend_from_slice(payload);

            let obj = decode(full).unwrap();
            assert_eq!(obj.kind(), Kind::Blob);
            assert_eq!(obj.payload(), payload);
            assert_eq!(obj.hash(), hash);
        }
    }

    #[test]
    fn test_decode_missing_nul() {
        let result = decode(b"blob 13 Hello, World".to_vec());
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_decode_bad_token_count() {
        assert!(matches!(
            decode(b"blob\0".to_vec()),
            Err(Error::MalformedHeader(_))
        ));
        assert!(matches!(
            decode(b"blob 1 2\0x".to_vec()),
            Err(Error::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_decode_bad_length() {
        assert!(matches!(
            decode(b"blob abc\0".to_vec()),
            Err(Error::MalformedHeader(_))
        ));
        assert!(matches!(
            decode(b"blob +1\0x".to_vec()),
            Err(Error::MalformedHeader(_))
        ));
        assert!(matches!(
            decode(b"blob \0".to_vec()),
            Err(Error::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_decode_size_mismatch() {
        let result = decode(b"blob 5\0123456".to_vec());
        assert!(matches!(
            result,
            Err(Error::SizeMismatch {
                expected: 5,
                actual: 6
            })
        ));
    }

    #[test]
    fn test_decode_unknown_kind() {
        let result = decode(b"tag 0\0".to_vec());
        assert!(matches!(result, Err(Error::UnsupportedKind(_))));
    }

    #[test]
    fn test_decode_payload_may_contain_nul() {
        let obj = decode(b"blob 3\0a\0b".to_vec()).unwrap();
        assert_eq!(obj.payload(), b"a\0b");
    }
}
