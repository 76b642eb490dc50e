//! the object model: kinds, canonical encoding and the immutable [`Object`]

pub mod codec;
mod kind;

pub use codec::{decode, encode};
pub use kind::Kind;

use std::fmt;

use crate::hash::Hash;

/// an immutable, content-addressed object
///
/// holds the full canonical bytes (header + payload). the hash is computed
/// once at construction and always matches those bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Object {
    kind: Kind,
    hash: Hash,
    data: Vec<u8>,
    payload_start: usize,
}

impl Object {
    /// create an object of `kind` around `payload`
    pub fn new(kind: Kind, payload: &[u8]) -> Self {
        let (header, hash) = encode(kind, payload);
        let payload_start = header.len();

        let mut data = header;
        data.extend_from_slice(payload);

        Self {
            kind,
            hash,
            data,
            payload_start,
        }
    }

    /// create a blob from raw file content
    pub fn blob(content: &[u8]) -> Self {
        Self::new(Kind::Blob, content)
    }

    pub(crate) fn from_parts(kind: Kind, hash: Hash, data: Vec<u8>, payload_start: usize) -> Self {
        Self {
            kind,
            hash,
            data,
            payload_start,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// kind-specific payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.data[self.payload_start..]
    }

    /// payload length in bytes
    pub fn size(&self) -> usize {
        self.data.len() - self.payload_start
    }

    /// full canonical bytes, exactly what gets compressed to disk
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("kind", &self.kind)
            .field("hash", &self.hash)
            .field("size", &self.size())
            .finish()
    }
}
