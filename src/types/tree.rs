use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::hash::{Hash, HASH_LEN};
use crate::object::{Kind, Object};

/// mode of a tree entry, as git writes it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileMode {
    Regular,
    Executable,
    Symlink,
    Directory,
    Submodule,
}

impl FileMode {
    /// numeric mode bits
    pub fn bits(&self) -> u32 {
        match self {
            FileMode::Regular => 0o100644,
            FileMode::Executable => 0o100755,
            FileMode::Symlink => 0o120000,
            FileMode::Directory => 0o040000,
            FileMode::Submodule => 0o160000,
        }
    }

    /// map numeric mode bits back to a mode
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0o100644 => Some(FileMode::Regular),
            0o100755 => Some(FileMode::Executable),
            0o120000 => Some(FileMode::Symlink),
            0o040000 => Some(FileMode::Directory),
            0o160000 => Some(FileMode::Submodule),
            _ => None,
        }
    }

    /// kind of the object an entry with this mode points at
    pub fn object_type(&self) -> &'static str {
        match self {
            FileMode::Directory => "tree",
            FileMode::Submodule => "commit",
            _ => "blob",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileMode::Directory)
    }
}

impl fmt::Display for FileMode {
    /// octal without leading zeros, as stored in tree payloads
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.bits())
    }
}

/// a single entry in a tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: String,
    hash: Hash,
}

impl TreeEntry {
    /// create an entry, rejecting empty or path-like names and the zero hash
    pub fn new(mode: FileMode, name: impl Into<String>, hash: Hash) -> Result<Self> {
        let name = name.into();
        validate_entry_name(&name)?;
        if hash.is_zero() {
            return Err(Error::ZeroHash(name));
        }
        Ok(Self { mode, name, hash })
    }

    /// create an entry from raw mode bits
    pub fn from_raw(bits: u32, name: impl Into<String>, hash: Hash) -> Result<Self> {
        let name = name.into();
        if bits == 0 {
            return Err(Error::ZeroMode(name));
        }
        let mode = FileMode::from_bits(bits).ok_or_else(|| Error::UnknownMode(format!("{:o}", bits)))?;
        Self::new(mode, name, hash)
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// git's tree order: directories compare as if their name ended in '/'
    fn git_cmp(&self, other: &TreeEntry) -> Ordering {
        self.sort_key().cmp(other.sort_key())
    }

    fn sort_key(&self) -> impl Iterator<Item = u8> + '_ {
        let trailer = self.mode.is_directory().then_some(b'/');
        self.name.bytes().chain(trailer)
    }
}

impl fmt::Display for TreeEntry {
    /// `cat-file -p` line: `<mode> <type> <hash>\t<name>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:06o} {} {}\t{}",
            self.mode.bits(),
            self.mode.object_type(),
            self.hash,
            self.name
        )
    }
}

fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    if name.contains('/') {
        return Err(Error::InvalidEntryName(format!(
            "name contains '/': {}",
            name
        )));
    }
    if name.contains('\0') {
        return Err(Error::InvalidEntryName(format!(
            "name contains null byte: {:?}",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidEntryName(format!("reserved name: {}", name)));
    }
    Ok(())
}

/// a directory listing, always kept in git's tree order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// create a tree from entries in any order
    pub fn from_entries(mut entries: Vec<TreeEntry>) -> Result<Self> {
        {
            let mut seen = HashSet::new();
            for entry in &entries {
                if !seen.insert(entry.name.as_str()) {
                    return Err(Error::DuplicateEntry(entry.name.clone()));
                }
            }
        }

        entries.sort_by(TreeEntry::git_cmp);
        Ok(Self { entries })
    }

    /// insert an entry at its sorted position
    pub fn add(&mut self, entry: TreeEntry) -> Result<()> {
        if self.get(&entry.name).is_some() {
            return Err(Error::DuplicateEntry(entry.name));
        }
        let pos = self
            .entries
            .partition_point(|e| e.git_cmp(&entry) == Ordering::Less);
        self.entries.insert(pos, entry);
        Ok(())
    }

    /// entries in encoded order
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// look up entry by name
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// binary payload: `<mode> <name>\0<20 raw hash bytes>` per entry
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for entry in &self.entries {
            buf.extend_from_slice(entry.mode.to_string().as_bytes());
            buf.push(b' ');
            buf.extend_from_slice(entry.name.as_bytes());
            buf.push(0);
            buf.extend_from_slice(entry.hash.as_bytes());
        }
        buf
    }

    /// encode into a tree object
    pub fn to_object(&self) -> Object {
        Object::new(Kind::Tree, &self.encode())
    }

    /// parse a tree payload
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < payload.len() {
            let rest = &payload[pos..];

            let space = rest
                .iter()
                .position(|&b| b == b' ')
                .ok_or(Error::TruncatedEntry { offset: pos })?;
            let nul = rest[space..]
                .iter()
                .position(|&b| b == 0)
                .map(|i| space + i)
                .ok_or(Error::TruncatedEntry { offset: pos })?;

            let hash_start = nul + 1;
            if rest.len() - hash_start < HASH_LEN {
                return Err(Error::TruncatedEntry {
                    offset: pos + hash_start,
                });
            }

            let mode = parse_mode(&rest[..space])?;
            let name = String::from_utf8(rest[space + 1..nul].to_vec()).map_err(|e| {
                Error::InvalidEntryName(String::from_utf8_lossy(e.as_bytes()).into_owned())
            })?;
            let hash = Hash::from_bytes(&rest[hash_start..hash_start + HASH_LEN])?;

            entries.push(TreeEntry::from_raw(mode, name, hash)?);
            pos += hash_start + HASH_LEN;
        }

        Ok(Self { entries })
    }
}

/// octal mode digits exactly as git writes them: no sign, no leading zero
fn parse_mode(raw: &[u8]) -> Result<u32> {
    let unknown = || Error::UnknownMode(String::from_utf8_lossy(raw).into_owned());
    // a bare "0" is left for from_raw to reject as a zero mode
    let canonical = raw == b"0"
        || matches!(raw.first(), Some(b'1'..=b'7'))
        && raw.iter().all(|b| matches!(b, b'0'..=b'7'));
    if !canonical {
        return Err(unknown());
    }
    let text = std::str::from_utf8(raw).map_err(|_| unknown())?;
    u32::from_str_radix(text, 8).map_err(|_| unknown())
}
