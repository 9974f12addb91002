//! Connection settings for one WLED controller.

use core::time::Duration;

/// Where the controller lives and how long to wait for it.
///
/// ```rust
/// use core::time::Duration;
/// use wled_matrix::WledConfig;
///
/// let config = WledConfig::new("192.168.1.40").with_timeout(Duration::from_millis(1500));
/// assert_eq!(config.json_url(), "http://192.168.1.40/json");
///
/// let moved = config.with_host("wled.local:8080");
/// assert_eq!(moved.json_url(), "http://wled.local:8080/json");
/// assert_eq!(moved.timeout, Duration::from_millis(1500));
/// assert_eq!(WledConfig::default().host, WledConfig::DEFAULT_HOST);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WledConfig {
    /// Host name or IP, optionally with `:port`.
    pub host: String,
    /// Upper bound on one request, connect through response.
    pub timeout: Duration,
}

impl WledConfig {
    /// Controller address used when none is given.
    pub const DEFAULT_HOST: &'static str = "10.0.0.221";
    /// Per-request timeout used when none is given.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Settings for the controller at `host` with the default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Replace the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replace the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the JSON state endpoint.
    #[must_use]
    pub fn json_url(&self) -> String {
        format!("http://{}/json", self.host)
    }
}

impl Default for WledConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOST)
    }
}
