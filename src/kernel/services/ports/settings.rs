use super::config::EditorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: f64,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_max_file_size_mb() -> f64 {
    10.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            request_timeout_ms: None,
        }
    }
}

impl Settings {
    pub fn editor_config(&self) -> EditorConfig {
        let threshold = if self.max_file_size_mb.is_finite() && self.max_file_size_mb > 0.0 {
            (self.max_file_size_mb * BYTES_PER_MB) as u64
        } else {
            EditorConfig::default().safe_load_threshold
        };

        EditorConfig::default()
            .with_threshold(threshold)
            .with_request_timeout(self.request_timeout_ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
