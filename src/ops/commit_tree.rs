use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::Kind;
use crate::store::ObjectStore;
use crate::types::{Commit, Signature};

/// create and store a commit for an already stored tree
///
/// `tree` must name a tree object and `parent`, if given, a commit object.
pub fn commit_tree(
    store: &ObjectStore,
    tree: Hash,
    parent: Option<Hash>,
    author: Option<Signature>,
    message: &str,
) -> Result<Hash> {
    expect_kind(store, &tree, Kind::Tree)?;

    let mut commit = Commit::new(tree, message)?;
    if let Some(parent) = parent {
        expect_kind(store, &parent, Kind::Commit)?;
        commit = commit.with_parent(parent)?;
    }
    if let Some(author) = author {
        commit = commit.with_author(author);
    }

    let obj = commit.to_object();
    store.write(&obj)?;
    Ok(obj.hash())
}

fn expect_kind(store: &ObjectStore, hash: &Hash, expected: Kind) -> Result<()> {
    if hash.is_zero() {
        return Err(Error::ZeroHash(format!("{} reference", expected)));
    }
    let actual = store.read_by_hash(hash)?.kind();
    if actual != expected {
        return Err(Error::WrongKind {
            hash: *hash,
            expected: expected.as_str(),
            actual: actual.as_str(),
        });
    }
    Ok(())
}
