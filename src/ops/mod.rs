//! plumbing operations on pit repositories

mod cat_file;
mod commit_tree;
mod fsck;
mod hash_object;
mod write_tree;

pub use cat_file::{cat_file, render, CatMode};
pub use commit_tree::commit_tree;
pub use fsck::{fsck, CorruptObject, FsckReport};
pub use hash_object::{hash_file, hash_object, hash_reader};
pub use write_tree::{write_tree, TreeBuilder};
