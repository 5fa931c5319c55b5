use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const SCHEME_SEPARATOR: &str = "://";
const FILE_SCHEME: &str = "file";

/// Stable identity of an opened resource (`file:///a/b.bin`, `untitled://1`,
/// or a bare path, which is treated as `file`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentUri(String);

impl DocumentUri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(format!(
            "{FILE_SCHEME}{SCHEME_SEPARATOR}{}",
            path.to_string_lossy()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        match self.0.split_once(SCHEME_SEPARATOR) {
            Some((scheme, _)) => scheme,
            None => FILE_SCHEME,
        }
    }

    /// `None` for non-`file` schemes. No percent-decoding is applied.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        match self.0.split_once(SCHEME_SEPARATOR) {
            Some((FILE_SCHEME, rest)) => Some(PathBuf::from(rest)),
            Some(_) => None,
            None => Some(PathBuf::from(&self.0)),
        }
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentUri {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&Path> for DocumentUri {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}
