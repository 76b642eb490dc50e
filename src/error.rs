use std::path::PathBuf;

use crate::Hash;

/// error type for pit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("repository not found at {0}")]
    NoRepo(PathBuf),

    #[error("repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("invalid hash format: {0:?}")]
    InvalidFormat(String),

    #[error("invalid hash length: expected 20 bytes, got {0}")]
    InvalidLength(usize),

    #[error("malformed object header: {0}")]
    MalformedHeader(String),

    #[error("object size mismatch: header says {expected}, payload has {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("truncated tree entry at byte {offset}")]
    TruncatedEntry { offset: usize },

    #[error("unsupported object type: {0}")]
    UnsupportedKind(String),

    #[error("object not found: {0}")]
    NotFound(PathBuf),

    #[error("corrupt compression in {path}: {source}")]
    CorruptCompression {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate tree entry name: {0}")]
    DuplicateEntry(String),

    #[error("tree entry name must not be empty")]
    EmptyName,

    #[error("invalid tree entry name: {0}")]
    InvalidEntryName(String),

    #[error("zero hash for {0}")]
    ZeroHash(String),

    #[error("zero mode for tree entry {0}")]
    ZeroMode(String),

    #[error("unknown file mode: {0}")]
    UnknownMode(String),

    #[error("expected {expected} object {hash}, found {actual}")]
    WrongKind {
        hash: Hash,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid ignore pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid commit: {0}")]
    InvalidCommit(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
