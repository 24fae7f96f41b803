//! Configuration for Polarway early-access administration

use std::time::Duration;

/// Default staff domain when `POLARWAY_STAFF_DOMAINS` is unset
pub const DEFAULT_STAFF_DOMAIN: &str = "polarway.dev";

/// Access configuration
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Email domains whose members are staff
    pub staff_domains: Vec<String>,

    /// Individual staff emails outside the staff domains
    pub staff_emails: Vec<String>,

    /// Max invocations per operation per caller within `rate_window`
    pub rate_limit: u32,

    /// Rate-limit window length
    pub rate_window: Duration,

    /// Mailbox capacity of the directory and flag actors
    pub channel_capacity: usize,
}

impl AccessConfig {
    /// Create config with sensible defaults
    ///
    /// Staff membership is read from the environment:
    /// * `POLARWAY_STAFF_DOMAINS` - comma-separated domains (default: `polarway.dev`)
    /// * `POLARWAY_STAFF_EMAILS` - comma-separated individual addresses
    pub fn new() -> Self {
        let staff_domains = std::env::var("POLARWAY_STAFF_DOMAINS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| vec![DEFAULT_STAFF_DOMAIN.to_string()]);
        let staff_emails = std::env::var("POLARWAY_STAFF_EMAILS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Self {
            staff_domains,
            staff_emails,
            rate_limit: 10,
            rate_window: Duration::from_secs(60),
            channel_capacity: 256,
        }
    }

    /// Replace staff domains
    pub fn with_staff_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staff_domains = domains
            .into_iter()
            .map(|d| d.into().trim().to_lowercase())
            .collect();
        self
    }

    /// Add a single staff email
    pub fn with_staff_email(mut self, email: impl Into<String>) -> Self {
        self.staff_emails.push(email.into().trim().to_lowercase());
        self
    }

    /// Override the per-operation rate limit
    pub fn with_rate_limit(mut self, limit: u32, window: Duration) -> Self {
        self.rate_limit = limit;
        self.rate_window = window;
        self
    }

    /// Override actor mailbox capacity
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
