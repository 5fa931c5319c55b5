//! zhex - read-only binary document viewer core
//!
//! Module layout:
//! - core: lifecycle primitives (dispose signals, subscriptions)
//! - kernel: documents, views, the message broker and the editor controller
//! - kernel::services: byte sources, settings, backups, markup and stdio transport

pub mod core;
pub mod kernel;
