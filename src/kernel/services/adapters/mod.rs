//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod backup;
pub mod file;
pub mod markup;
pub mod memory;
pub mod settings;
pub mod stdio;

pub use backup::{backup_path_for, ensure_log_dir, find_backup, get_backup_dir, get_log_dir};
pub use file::LocalByteSource;
pub use markup::HexDumpMarkup;
pub use memory::MemoryByteSource;
pub use settings::{ensure_settings_file, get_settings_path, load_settings};
