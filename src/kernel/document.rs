//! Binary document model.
//!
//! A document owns the bytes of one opened resource. Files larger than the
//! safe-load threshold are materialized only up to the threshold until the
//! user explicitly asks for a full load (`open_anyways`).
//!
//! Invariants:
//! - `file_size` is fixed at creation.
//! - `content.len() <= file_size` at all times.
//! - `opened_fully` and `disposed` never revert to `false`.

use super::broker::RequestError;
use super::uri::DocumentUri;
use crate::core::lifecycle::{DisposeSignal, Subscription};
use crate::kernel::services::ports::{BoxFuture, ByteSource, ByteSourceError};
use std::sync::Arc;

#[derive(Debug)]
pub enum DocumentError {
    /// The byte source could not be read.
    Load {
        uri: DocumentUri,
        source: ByteSourceError,
    },
    NoLiveView(DocumentUri),
    NotOpen(DocumentUri),
    Disposed(DocumentUri),
    Request(RequestError),
}

impl DocumentError {
    fn load(uri: &DocumentUri, source: ByteSourceError) -> Self {
        DocumentError::Load {
            uri: uri.clone(),
            source,
        }
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Load { uri, source } => write!(f, "Failed to load {}: {}", uri, source),
            DocumentError::NoLiveView(uri) => write!(f, "No live view for {}", uri),
            DocumentError::NotOpen(uri) => write!(f, "Document not open: {}", uri),
            DocumentError::Disposed(uri) => write!(f, "Document disposed: {}", uri),
            DocumentError::Request(e) => write!(f, "View request failed: {}", e),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Load { source, .. } => Some(source),
            DocumentError::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RequestError> for DocumentError {
    fn from(e: RequestError) -> Self {
        DocumentError::Request(e)
    }
}

/// Supplies the authoritative current bytes of a document, as held by one of
/// its live views.
pub trait DocumentDelegate: Send + Sync {
    fn file_data(&self, uri: &DocumentUri) -> BoxFuture<Result<Vec<u8>, DocumentError>>;
}

pub struct BinaryDocument {
    uri: DocumentUri,
    backup_id: Option<DocumentUri>,
    file_size: u64,
    content: Vec<u8>,
    opened_fully: bool,
    disposed: bool,
    threshold: u64,
    source: Arc<dyn ByteSource>,
    delegate: Arc<dyn DocumentDelegate>,
    on_dispose: DisposeSignal,
}

impl BinaryDocument {
    /// Reads at most `threshold` bytes. With a `backup_id` the bytes come from
    /// the backup, while the document keeps `uri` as its identity.
    pub fn create(
        uri: DocumentUri,
        backup_id: Option<DocumentUri>,
        source: Arc<dyn ByteSource>,
        delegate: Arc<dyn DocumentDelegate>,
        threshold: u64,
    ) -> Result<Self, DocumentError> {
        let data_uri = backup_id.as_ref().unwrap_or(&uri);
        let file_size = source
            .size(data_uri)
            .map_err(|e| DocumentError::load(&uri, e))?;
        let mut content = source
            .read(data_uri, Some(threshold))
            .map_err(|e| DocumentError::load(&uri, e))?;
        content.truncate(clamp_len(file_size.min(threshold)));

        let opened_fully = content.len() as u64 == file_size;
        tracing::info!(
            uri = %uri,
            backup = backup_id.is_some(),
            file_size,
            loaded = content.len(),
            "document opened"
        );

        Ok(Self {
            uri,
            backup_id,
            file_size,
            content,
            opened_fully,
            disposed: false,
            threshold,
            source,
            delegate,
            on_dispose: DisposeSignal::new(),
        })
    }

    /// Loads the whole resource. A no-op once the document is fully open.
    pub fn open_anyways(&mut self) -> Result<(), DocumentError> {
        if self.disposed {
            return Err(DocumentError::Disposed(self.uri.clone()));
        }
        if self.opened_fully {
            tracing::debug!(uri = %self.uri, "document already fully open");
            return Ok(());
        }

        let data_uri = self.backup_id.as_ref().unwrap_or(&self.uri);
        let mut content = self
            .source
            .read(data_uri, None)
            .map_err(|e| DocumentError::load(&self.uri, e))?;
        content.truncate(clamp_len(self.file_size));

        self.content = content;
        self.opened_fully = true;
        tracing::info!(uri = %self.uri, loaded = self.content.len(), "document fully loaded");
        Ok(())
    }

    /// `listener` runs once, on the first `dispose`, while the subscription lives.
    pub fn register_disposal_listener(
        &self,
        listener: impl FnOnce() + Send + 'static,
    ) -> Subscription {
        self.on_dispose.subscribe(listener)
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        tracing::info!(uri = %self.uri, "document disposed");
        self.on_dispose.fire();
    }

    /// Asks a live view for the bytes it currently holds.
    pub fn request_current_bytes(&self) -> BoxFuture<Result<Vec<u8>, DocumentError>> {
        if self.disposed {
            let uri = self.uri.clone();
            return Box::pin(async move { Err(DocumentError::Disposed(uri)) });
        }
        self.delegate.file_data(&self.uri)
    }

    pub fn uri(&self) -> &DocumentUri {
        &self.uri
    }

    pub fn backup_id(&self) -> Option<&DocumentUri> {
        self.backup_id.as_ref()
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn opened_fully(&self) -> bool {
        self.opened_fully
    }

    /// Every byte of the resource is in memory.
    pub fn is_fully_loaded(&self) -> bool {
        self.content.len() as u64 == self.file_size
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn is_read_only(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for BinaryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryDocument")
            .field("uri", &self.uri)
            .field("file_size", &self.file_size)
            .field("loaded", &self.content.len())
            .field("opened_fully", &self.opened_fully)
            .field("disposed", &self.disposed)
            .finish()
    }
}

fn clamp_len(len: u64) -> usize {
    usize::try_from(len).unwrap_or(usize::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/document.rs"]
mod tests;
