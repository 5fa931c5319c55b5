use crate::kernel::DocumentUri;
use std::io;

pub type Result<T> = std::result::Result<T, ByteSourceError>;

#[derive(Debug)]
pub enum ByteSourceError {
    Io(io::Error),
    NotFound(DocumentUri),
    NotAFile(DocumentUri),
    UnsupportedScheme(String),
}

impl std::fmt::Display for ByteSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteSourceError::Io(e) => write!(f, "IO error: {}", e),
            ByteSourceError::NotFound(uri) => write!(f, "Not found: {}", uri),
            ByteSourceError::NotAFile(uri) => write!(f, "Not a file: {}", uri),
            ByteSourceError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported scheme: {}", scheme)
            }
        }
    }
}

impl std::error::Error for ByteSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ByteSourceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ByteSourceError {
    fn from(e: io::Error) -> Self {
        ByteSourceError::Io(e)
    }
}

/// Read-only access to the bytes behind a locator. This is the host's file
/// API as seen by the document model.
pub trait ByteSource: Send + Sync {
    fn scheme(&self) -> &'static str;

    /// Rejects locators this source does not serve.
    fn check_scheme(&self, uri: &DocumentUri) -> Result<()> {
        if uri.scheme() == self.scheme() {
            Ok(())
        } else {
            Err(ByteSourceError::UnsupportedScheme(uri.scheme().to_string()))
        }
    }

    /// True total size, independent of any truncated read.
    fn size(&self, uri: &DocumentUri) -> Result<u64>;

    /// Reads from the start of the resource, at most `limit` bytes when given.
    fn read(&self, uri: &DocumentUri, limit: Option<u64>) -> Result<Vec<u8>>;
}
