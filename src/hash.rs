use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// number of raw bytes in a hash
pub const HASH_LEN: usize = 20;

/// number of hex characters in a hash
pub const HEX_LEN: usize = HASH_LEN * 2;

/// SHA-1 hash used for content addressing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    /// zero hash (sentinel for "no parent" / "unset")
    pub const ZERO: Hash = Hash([0u8; HASH_LEN]);

    /// create from a raw byte array
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// create from a byte slice, which must be exactly 20 bytes long
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let arr: [u8; HASH_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// parse from a 40 character hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        if s.len() != HEX_LEN {
            return Err(Error::InvalidFormat(s.to_string()));
        }
        let mut arr = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut arr).map_err(|_| Error::InvalidFormat(s.to_string()))?;
        Ok(Self(arr))
    }

    /// hash a complete byte sequence
    pub fn digest(data: &[u8]) -> Self {
        Self(Sha1::digest(data).into())
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// first `n` hex characters, `n` clamped to [1, 40]
    pub fn short(&self, n: usize) -> String {
        let n = n.clamp(1, HEX_LEN);
        let mut hex = self.to_hex();
        hex.truncate(n);
        hex
    }

    /// true iff every byte is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LEN]
    }

    /// split into path components for object store
    /// returns (first 2 hex chars, remaining 38 hex chars)
    pub fn to_path_components(&self) -> (String, String) {
        let hex = self.to_hex();
        (hex[..2].to_string(), hex[2..].to_string())
    }
}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.short(12))
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// streaming hasher for data fed in pieces
#[derive(Default)]
pub struct Hasher {
    inner: Sha1,
}

impl Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// feed bytes
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// finalize and return hash
    pub fn finalize(self) -> Hash {
        Hash(self.inner.finalize().into())
    }
}
