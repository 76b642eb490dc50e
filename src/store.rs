//! loose object storage
//!
//! objects live at `<root>/<first 2 hex chars>/<remaining 38 hex chars>` as a
//! zlib stream of their canonical bytes. writes go through a temp file in the
//! same fan-out directory and are renamed into place, so a crash never leaves
//! a truncated file under an object's path.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::Hash;
use crate::object::{decode, Object};

/// zlib level used when no configuration says otherwise
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// a directory of loose, zlib-compressed objects
#[derive(Clone, Debug)]
pub struct ObjectStore {
    root: PathBuf,
    compression: Compression,
}

impl ObjectStore {
    /// open a store rooted at `root` (usually `.pit/objects`)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_compression(root, DEFAULT_COMPRESSION_LEVEL)
    }

    /// open a store with an explicit zlib level (clamped to 0..=9)
    pub fn with_compression(root: impl Into<PathBuf>, level: u32) -> Self {
        Self {
            root: root.into(),
            compression: Compression::new(level.min(9)),
        }
    }

    /// objects root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// path an object with `hash` is stored at
    pub fn object_path(&self, hash: &Hash) -> PathBuf {
        let (dir, file) = hash.to_path_components();
        self.root.join(dir).join(file)
    }

    /// check if an object exists in the store
    pub fn exists(&self, hash: &Hash) -> bool {
        self.object_path(hash).is_file()
    }

    /// write an object and return its path
    ///
    /// writing an object that is already present leaves the existing file
    /// untouched: same hash means same bytes.
    pub fn write(&self, object: &Object) -> Result<PathBuf> {
        let hash = object.hash();
        let path = self.object_path(&hash);

        // dedup: an intact copy is already in place
        if path.exists() {
            if self.holds(&path, &hash) {
                debug!(%hash, kind = %object.kind(), "object already stored");
                return Ok(path);
            }
            warn!(%hash, path = %path.display(), "replacing damaged object file");
        }

        let dir = self.root.join(&hash.to_path_components().0);
        fs::create_dir_all(&dir).with_path(&dir)?;

        let compressed = self.compress(object.as_bytes())?;

        // atomic write: temp -> fsync -> read-only -> rename
        let tmp_path = dir.join(format!(".tmp-{}", uuid::Uuid::new_v4()));
        if let Err(e) = write_read_only(&tmp_path, &compressed) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::Io { path, source: e });
        }

        fsync_dir(&dir)?;

        debug!(%hash, kind = %object.kind(), size = object.size(), "wrote object");
        Ok(path)
    }

    /// true if `path` decodes to the object named `hash`
    fn holds(&self, path: &Path, hash: &Hash) -> bool {
        self.read(path).is_ok_and(|o| o.hash() == *hash)
    }

    /// read and decode the object stored at `path`
    pub fn read(&self, path: &Path) -> Result<Object> {
        let compressed = fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.to_path_buf())
            } else {
                Error::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let mut data = Vec::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut data)
            .map_err(|source| Error::CorruptCompression {
                path: path.to_path_buf(),
                source,
            })?;

        decode(data)
    }

    /// read the object with `hash`
    pub fn read_by_hash(&self, hash: &Hash) -> Result<Object> {
        self.read(&self.object_path(hash))
    }

    /// read the object named by a 40 character hex string
    pub fn read_by_hex(&self, hex: &str) -> Result<Object> {
        let hash = Hash::from_hex(hex)?;
        self.read_by_hash(&hash)
    }

    /// hashes of every object file under the root, in path order
    pub fn list(&self) -> Result<Vec<Hash>> {
        let mut hashes = Vec::new();

        if !self.root.exists() {
            return Ok(hashes);
        }

        for entry in WalkDir::new(&self.root)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Io {
                path: self.root.clone(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walkdir error")),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let parent_name = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("");

            // skips leftover temp files and anything else that isn't an object
            if parent_name.len() != 2 {
                continue;
            }
            if let Ok(hash) = Hash::from_hex(&format!("{}{}", parent_name, file_name)) {
                hashes.push(hash);
            }
        }

        Ok(hashes)
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let zlib_err = |e| Error::Io {
            path: PathBuf::from("<zlib>"),
            source: e,
        };
        let mut encoder = ZlibEncoder::new(Vec::new(), self.compression);
        encoder.write_all(data).map_err(zlib_err)?;
        encoder.finish().map_err(zlib_err)
    }
}

fn write_read_only(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path).with_path(path)?;
    file.write_all(data).with_path(path)?;
    file.sync_all().with_path(path)?;

    let mut perms = file.metadata().with_path(path)?.permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms).with_path(path)?;
    Ok(())
}

fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}
