use std::io::Write;

use crate::error::{IoResultExt, Result};
use crate::hash::Hash;
use crate::object::{Kind, Object};
use crate::store::ObjectStore;
use crate::types::Tree;

/// what `cat-file` prints about an object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatMode {
    /// blob bytes, tree listing or commit text
    #[default]
    Pretty,
    /// the kind tag
    Type,
    /// payload size in bytes
    Size,
}

/// render an object the way `cat-file` shows it
pub fn render(object: &Object, mode: CatMode) -> Result<Vec<u8>> {
    match mode {
        CatMode::Type => Ok(format!("{}\n", object.kind()).into_bytes()),
        CatMode::Size => Ok(format!("{}\n", object.size()).into_bytes()),
        CatMode::Pretty => match object.kind() {
            Kind::Blob | Kind::Commit => Ok(object.payload().to_vec()),
            Kind::Tree => {
                let tree = Tree::decode(object.payload())?;
                let mut out = String::new();
                for entry in tree.entries() {
                    out.push_str(&entry.to_string());
                    out.push('\n');
                }
                Ok(out.into_bytes())
            }
        },
    }
}

/// look up `hash` and write its rendering to `out`
pub fn cat_file<W: Write>(store: &ObjectStore, hash: &Hash, mode: CatMode, out: &mut W) -> Result<()> {
    let object = store.read_by_hash(hash)?;
    let rendered = render(&object, mode)?;
    out.write_all(&rendered).with_path("<stdout>")?;
    Ok(())
}
