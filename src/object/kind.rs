use std::fmt;
use std::str::FromStr;

use crate::Error;

/// the three object kinds pit stores
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Blob,
    Tree,
    Commit,
}

impl Kind {
    /// lowercase tag used in object headers
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
            Kind::Commit => "commit",
        }
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "blob" => Ok(Kind::Blob),
            "tree" => Ok(Kind::Tree),
            "commit" => Ok(Kind::Commit),
            other => Err(Error::UnsupportedKind(other.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        for kind in [Kind::Blob, Kind::Tree, Kind::Commit] {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_kind_rejects_unknown() {
        assert!(matches!("tag".parse::<Kind>(), Err(Error::UnsupportedKind(t)) if t == "tag"));
        assert!("Blob".parse::<Kind>().is_err());
        assert!("".parse::<Kind>().is_err());
    }
}
