//! Service ports: traits + data contracts.

pub mod byte_source;
pub mod config;
pub mod markup;
pub mod runtime;
pub mod settings;

pub use byte_source::{ByteSource, ByteSourceError, Result as ByteSourceResult};
pub use config::EditorConfig;
pub use markup::MarkupProvider;
pub use runtime::BoxFuture;
pub use settings::Settings;
