use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval between background renewal ticks, in seconds.
    pub renewal_interval_secs: u64,
}

impl SessionConfig {
    #[must_use]
    pub fn renewal_interval(&self) -> Duration {
        Duration::from_secs(self.renewal_interval_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            renewal_interval_secs: 120,
        }
    }
}
