//! Framework primitives shared by the kernel.
//!
//! - lifecycle: fire-once disposal signals and scoped subscriptions

pub mod lifecycle;

pub use lifecycle::{DisposeSignal, Subscription};
