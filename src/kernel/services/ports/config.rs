use std::time::Duration;

pub const DEFAULT_SAFE_LOAD_THRESHOLD: u64 = 10 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Maximum bytes materialized before the user opts into a full load.
    pub safe_load_threshold: u64,
    /// `None` keeps view requests pending until answered or the view goes away.
    pub request_timeout: Option<Duration>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            safe_load_threshold: DEFAULT_SAFE_LOAD_THRESHOLD,
            request_timeout: None,
        }
    }
}

impl EditorConfig {
    pub fn with_threshold(mut self, bytes: u64) -> Self {
        self.safe_load_threshold = bytes;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}
