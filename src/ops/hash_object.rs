use std::io::Read;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::hash::Hash;
use crate::object::Object;
use crate::store::ObjectStore;

/// compute the blob hash of `data`, storing the blob when a store is given
pub fn hash_object(data: &[u8], store: Option<&ObjectStore>) -> Result<Hash> {
    let blob = Object::blob(data);
    if let Some(store) = store {
        store.write(&blob)?;
    }
    Ok(blob.hash())
}

/// hash the contents of a file
pub fn hash_file(path: &Path, store: Option<&ObjectStore>) -> Result<Hash> {
    let data = std::fs::read(path).with_path(path)?;
    hash_object(&data, store)
}

/// hash everything readable from `reader` (e.g. stdin)
pub fn hash_reader<R: Read>(reader: &mut R, store: Option<&ObjectStore>) -> Result<Hash> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).with_path("<stdin>")?;
    hash_object(&data, store)
}
