//! Local filesystem byte source (`file` scheme).

use crate::kernel::services::ports::byte_source::{ByteSource, ByteSourceError, Result};
use crate::kernel::DocumentUri;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

pub struct LocalByteSource;

impl LocalByteSource {
    pub fn new() -> Self {
        Self
    }

    fn path_for(&self, uri: &DocumentUri) -> Result<PathBuf> {
        self.check_scheme(uri)?;
        let path = uri
            .to_file_path()
            .ok_or_else(|| ByteSourceError::UnsupportedScheme(uri.scheme().to_string()))?;
        if !path.exists() {
            return Err(ByteSourceError::NotFound(uri.clone()));
        }
        if !path.is_file() {
            return Err(ByteSourceError::NotAFile(uri.clone()));
        }
        Ok(path)
    }
}

impl Default for LocalByteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for LocalByteSource {
    fn scheme(&self) -> &'static str {
        "file"
    }

    fn size(&self, uri: &DocumentUri) -> Result<u64> {
        let path = self.path_for(uri)?;
        Ok(fs::metadata(path)?.len())
    }

    fn read(&self, uri: &DocumentUri, limit: Option<u64>) -> Result<Vec<u8>> {
        let path = self.path_for(uri)?;
        let mut file = fs::File::open(path)?;
        let mut bytes = Vec::new();
        match limit {
            Some(limit) => {
                file.by_ref().take(limit).read_to_end(&mut bytes)?;
            }
            None => {
                file.read_to_end(&mut bytes)?;
            }
        }
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/file.rs"]
mod tests;
