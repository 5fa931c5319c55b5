//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the kernel.
//! - `adapters`: OS/runtime specific implementations (IO/async).
//! - `bus`: notices flowing from the kernel to the host.

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{host_bus, HostBusReceiver, HostBusSender, HostMessage, Notice, NoticeLevel};
