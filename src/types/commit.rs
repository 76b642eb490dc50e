use std::fmt;

use chrono::Local;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::{Kind, Object};

/// who made a commit and when
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    name: String,
    email: String,
    /// unix timestamp (seconds since epoch)
    timestamp: i64,
    /// offset in git form, e.g. "+0900"
    timezone: String,
}

impl Signature {
    /// create a signature with an explicit time
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: i64,
        timezone: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let email = email.into();
        let timezone = timezone.into();

        if name.is_empty() {
            return Err(Error::InvalidCommit("author name is empty".to_string()));
        }
        for field in [&name, &email] {
            if field.contains(&['<', '>', '\n'][..]) {
                return Err(Error::InvalidCommit(format!(
                    "author field contains '<', '>' or newline: {:?}",
                    field
                )));
            }
        }
        validate_timezone(&timezone)?;

        Ok(Self {
            name,
            email,
            timestamp,
            timezone,
        })
    }

    /// create a signature stamped with the current time and the local
    /// UTC offset
    pub fn now(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let now = Local::now();
        Self::new(name, email, now.timestamp(), now.format("%z").to_string())
    }

    /// like [`Signature::now`], with an explicit offset such as "+0900"
    pub fn now_in(
        name: impl Into<String>,
        email: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Result<Self> {
        Self::new(name, email, Local::now().timestamp(), timezone)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            self.name, self.email, self.timestamp, self.timezone
        )
    }
}

/// timezone must look like "+HHMM" or "-HHMM"
fn validate_timezone(tz: &str) -> Result<()> {
    let bytes = tz.as_bytes();
    let valid = bytes.len() == 5
        && matches!(bytes[0], b'+' | b'-')
        && bytes[1..].iter().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(Error::InvalidCommit(format!("invalid timezone: {:?}", tz)));
    }
    Ok(())
}

/// a commit: root tree, at most one parent, optional author and a message
///
/// author and committer are always the same identity. a commit without an
/// author is accepted here but other git tooling will reject it, so callers
/// that need interoperability must set one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    tree: Hash,
    parent: Option<Hash>,
    author: Option<Signature>,
    message: String,
}

impl Commit {
    /// create a commit for `tree`, which must not be the zero hash
    pub fn new(tree: Hash, message: impl Into<String>) -> Result<Self> {
        if tree.is_zero() {
            return Err(Error::ZeroHash("commit tree".to_string()));
        }
        Ok(Self {
            tree,
            parent: None,
            author: None,
            message: message.into(),
        })
    }

    /// set the parent commit, which must not be the zero hash
    pub fn with_parent(mut self, parent: Hash) -> Result<Self> {
        if parent.is_zero() {
            return Err(Error::ZeroHash("commit parent".to_string()));
        }
        self.parent = Some(parent);
        Ok(self)
    }

    pub fn with_author(mut self, author: Signature) -> Self {
        self.author = Some(author);
        self
    }

    pub fn tree(&self) -> Hash {
        self.tree
    }

    pub fn parent(&self) -> Option<Hash> {
        self.parent
    }

    pub fn author(&self) -> Option<&Signature> {
        self.author.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// line-oriented text payload
    pub fn encode(&self) -> Vec<u8> {
        let mut text = format!("tree {}\n", self.tree);
        if let Some(parent) = &self.parent {
            text.push_str(&format!("parent {}\n", parent));
        }
        if let Some(author) = &self.author {
            text.push_str(&format!("author {}\n", author));
            text.push_str(&format!("committer {}\n", author));
        }
        text.push('\n');
        text.push_str(&self.message);
        text.push('\n');
        text.into_bytes()
    }

    /// encode into a commit object
    pub fn to_object(&self) -> Object {
        Object::new(Kind::Commit, &self.encode())
    }
}
