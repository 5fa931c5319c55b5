//! Headless document/view core.
//!
//! A [`BinaryDocument`] holds the bytes of one resource, views attach to it
//! through the [`ViewRegistry`], and all traffic with a view goes through the
//! [`MessageBroker`]. The [`EditorController`] ties them together.

pub mod broker;
pub mod controller;
pub mod document;
pub mod protocol;
pub mod registry;
pub mod services;
pub mod uri;
pub mod view;

pub use broker::{MessageBroker, RequestError};
pub use controller::{EditorController, SharedDocument, ViewPhase, READ_ONLY_NOTICE};
pub use document::{BinaryDocument, DocumentDelegate, DocumentError};
pub use protocol::{
    FileDataResponse, Inbound, InitBody, Outbound, ProtocolError, RequestId, ViewEvent,
    ViewNotification, ViewRequest,
};
pub use registry::ViewRegistry;
pub use uri::DocumentUri;
pub use view::{ViewHandle, ViewId, ViewPort};
