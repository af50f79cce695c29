//! Planner configuration.

use std::time::Duration;

/// Configuration parameters for itinerary queries.
///
/// `default_window_mins` is the algorithm-level default; the HTTP layer
/// applies its own documented default (120) when the request omits the
/// field, so this value only governs direct library callers.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Hard cap on the number of transfers a query may request.
    pub max_transfers_cap: usize,

    /// Largest accepted time window, in minutes.
    pub max_window_mins: i64,

    /// Window applied when a library caller does not specify one.
    pub default_window_mins: i64,

    /// Wall-clock budget for one request.
    pub request_timeout_secs: u64,
}

impl SearchConfig {
    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_transfers_cap: 2,
            max_window_mins: 480,
            default_window_mins: 90,
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.max_transfers_cap, 2);
        assert_eq!(config.max_window_mins, 480);
        assert_eq!(config.default_window_mins, 90);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
