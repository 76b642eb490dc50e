use std::fs;
use std::path::Path;

use glob::Pattern;
use tracing::{debug, warn};

use crate::error::{Error, IoResultExt, Result};
use crate::hash::Hash;
use crate::object::Object;
use crate::repo::{Repo, LEGACY_METADATA_DIR, METADATA_DIR};
use crate::store::ObjectStore;
use crate::types::{FileMode, Tree, TreeEntry};

/// builds trees from directories, storing every blob and subtree on the way
pub struct TreeBuilder<'a> {
    store: &'a ObjectStore,
    ignore: Vec<Pattern>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        Self {
            store,
            ignore: vec![],
        }
    }

    /// also skip entries whose name matches any of `patterns`
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        for pattern in patterns {
            let compiled = Pattern::new(pattern).map_err(|e| Error::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            self.ignore.push(compiled);
        }
        Ok(self)
    }

    /// build the tree for `dir`
    ///
    /// blobs and subtrees are written as they are produced; the returned root
    /// tree is not, so the caller decides whether to store it.
    pub fn build(&self, dir: &Path) -> Result<Tree> {
        let mut tree = Tree::new();

        for entry in fs::read_dir(dir).with_path(dir)? {
            let entry = entry.with_path(dir)?;
            let path = entry.path();

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = %path.display(), "skipping entry with non UTF-8 name");
                continue;
            };
            if self.is_ignored(&name) {
                debug!(path = %path.display(), "ignored");
                continue;
            }

            let file_type = entry.file_type().with_path(&path)?;
            let tree_entry = if file_type.is_dir() {
                // recurse, then persist the subtree immediately
                let subtree = self.build(&path)?.to_object();
                self.store.write(&subtree)?;
                TreeEntry::new(FileMode::Directory, name, subtree.hash())?
            } else {
                // everything else is captured as a regular file
                let content = fs::read(&path).with_path(&path)?;
                let blob = Object::blob(&content);
                self.store.write(&blob)?;
                TreeEntry::new(FileMode::Regular, name, blob.hash())?
            };

            tree.add(tree_entry)?;
        }

        debug!(dir = %dir.display(), entries = tree.len(), "built tree");
        Ok(tree)
    }

    fn is_ignored(&self, name: &str) -> bool {
        name == METADATA_DIR
            || name == LEGACY_METADATA_DIR
            || self.ignore.iter().any(|p| p.matches(name))
    }
}

/// snapshot the repository's working tree and store the root tree
pub fn write_tree(repo: &Repo) -> Result<Hash> {
    let tree = TreeBuilder::new(repo.store())
        .with_ignore_patterns(&repo.config().core.ignore)?
        .build(repo.worktree())?;

    let root = tree.to_object();
    repo.store().write(&root)?;
    Ok(root.hash())
}
