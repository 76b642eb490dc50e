//! pit - a minimal git-compatible object store
//!
//! stores content-addressed objects in git's loose object format, so every
//! hash pit prints is the hash git would print for the same content.
//!
//! # Core concepts
//!
//! - **Blob**: raw file contents
//! - **Tree**: a sorted directory listing of (mode, name, hash) entries
//! - **Commit**: a tree snapshot with an optional parent, author and message
//!
//! # Object format
//!
//! every object is `"<kind> <len>\0" | payload`. its hash is SHA-1 over those
//! bytes, and it is stored zlib-compressed at `objects/<2 hex>/<38 hex>`.
//!
//! # Example usage
//!
//! ```no_run
//! use pit::{Repo, ops};
//! use std::path::Path;
//!
//! // initialize a repository
//! let repo = Repo::init(Path::new("/path/to/project")).unwrap();
//!
//! // snapshot the working tree
//! let tree = ops::write_tree(&repo).unwrap();
//!
//! // and record it
//! let commit = ops::commit_tree(repo.store(), tree, None, None, "initial commit").unwrap();
//! println!("{}", commit);
//! ```

mod config;
mod error;
mod hash;
mod repo;
mod store;

pub mod object;
pub mod ops;
pub mod types;

pub use config::{Config, CoreConfig, UserConfig};
pub use error::{Error, IoResultExt, Result};
pub use hash::{Hash, Hasher, HASH_LEN, HEX_LEN};
pub use object::{Kind, Object};
pub use repo::{Repo, LEGACY_METADATA_DIR, METADATA_DIR};
pub use store::{ObjectStore, DEFAULT_COMPRESSION_LEVEL};
pub use types::{Commit, FileMode, Signature, Tree, TreeEntry};
