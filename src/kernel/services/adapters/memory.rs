//! In-memory byte source for `mem://` locators, keyed by full locator.

use crate::kernel::services::ports::byte_source::{ByteSource, ByteSourceError, Result};
use crate::kernel::DocumentUri;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MemoryByteSource {
    files: Mutex<FxHashMap<DocumentUri, Arc<Vec<u8>>>>,
    reads: AtomicUsize,
}

impl MemoryByteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: impl Into<DocumentUri>, bytes: Vec<u8>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(uri.into(), Arc::new(bytes));
        }
    }

    pub fn remove(&self, uri: &DocumentUri) -> bool {
        self.files
            .lock()
            .map(|mut files| files.remove(uri).is_some())
            .unwrap_or(false)
    }

    /// Number of `read` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn lookup(&self, uri: &DocumentUri) -> Result<Arc<Vec<u8>>> {
        self.check_scheme(uri)?;
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(uri).cloned())
            .ok_or_else(|| ByteSourceError::NotFound(uri.clone()))
    }
}

impl ByteSource for MemoryByteSource {
    fn scheme(&self) -> &'static str {
        "mem"
    }

    fn size(&self, uri: &DocumentUri) -> Result<u64> {
        Ok(self.lookup(uri)?.len() as u64)
    }

    fn read(&self, uri: &DocumentUri, limit: Option<u64>) -> Result<Vec<u8>> {
        let bytes = self.lookup(uri)?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        let end = match limit {
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX).min(bytes.len()),
            None => bytes.len(),
        };
        Ok(bytes[..end].to_vec())
    }
}
