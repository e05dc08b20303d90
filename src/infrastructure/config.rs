use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("hurl-probe/", env!("CARGO_PKG_VERSION"));

/// Transport settings that are not part of the request itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Bound on the whole exchange; `None` leaves it unbounded.
    pub timeout: Option<Duration>,
    /// Skip certificate and hostname verification.
    pub insecure: bool,
}

impl ClientConfig {
    pub fn new(user_agent: Option<&str>, timeout_secs: Option<f64>, insecure: bool) -> Self {
        Self {
            user_agent: user_agent
                .filter(|agent| !agent.is_empty())
                .unwrap_or(DEFAULT_USER_AGENT)
                .to_string(),
            timeout: timeout_secs
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64),
            insecure,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None, None, false)
    }
}
