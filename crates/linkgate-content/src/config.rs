//! Content-source configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the WordPress content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// REST API root, e.g. `https://example.com/wp-json/wp/v2`.
    pub base_url: String,

    /// Maximum search results per query.
    ///
    /// Default: 15.
    pub per_page: u32,

    /// Upper bound on one upstream call, in seconds.
    ///
    /// Default: 10.
    pub timeout_secs: u64,
}

impl ContentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://seashell-whale-304753.hostingersite.com/wp-json/wp/v2".into(),
            per_page: 15,
            timeout_secs: 10,
        }
    }
}
