use tracing::{debug, warn};

use crate::error::Result;
use crate::hash::Hash;
use crate::object::Kind;
use crate::store::ObjectStore;
use crate::types::Tree;

/// fsck report
#[derive(Debug, Default)]
pub struct FsckReport {
    /// objects checked
    pub objects_checked: usize,
    /// objects that failed to read, decode or hash to their own name
    pub corrupt_objects: Vec<CorruptObject>,
}

impl FsckReport {
    pub fn is_ok(&self) -> bool {
        self.corrupt_objects.is_empty()
    }
}

#[derive(Debug)]
pub struct CorruptObject {
    pub hash: Hash,
    pub message: String,
}

/// verify every object in the store
///
/// each object must inflate, carry a well-formed header, hash to the name it
/// is stored under and, for trees, hold a parseable entry list.
pub fn fsck(store: &ObjectStore) -> Result<FsckReport> {
    let mut report = FsckReport::default();

    for hash in store.list()? {
        report.objects_checked += 1;

        if let Some(message) = check_object(store, &hash) {
            warn!(%hash, %message, "corrupt object");
            report.corrupt_objects.push(CorruptObject { hash, message });
        }
    }

    debug!(
        checked = report.objects_checked,
        corrupt = report.corrupt_objects.len(),
        "fsck finished"
    );
    Ok(report)
}

fn check_object(store: &ObjectStore, hash: &Hash) -> Option<String> {
    let object = match store.read_by_hash(hash) {
        Ok(object) => object,
        Err(e) => return Some(e.to_string()),
    };

    if object.hash() != *hash {
        return Some(format!(
            "hash mismatch: expected {}, got {}",
            hash,
            object.hash()
        ));
    }

    if object.kind() == Kind::Tree {
        if let Err(e) = Tree::decode(object.payload()) {
            return Some(format!("bad tree: {}", e));
        }
    }

    None
}
