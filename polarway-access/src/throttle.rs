//! Fixed-window rate limiting per (operation, caller)
//!
//! Uses tokio's clock so paused-time tests can step through windows.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::AccessConfig;
use crate::error::{AccessError, Result};
use crate::types::AdminOperation;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self { started: now, hits: 0 }
    }
}

/// Independent counters for every operation and caller
pub struct Throttle {
    windows: DashMap<(AdminOperation, String), Window>,
    limit: u32,
    window: Duration,
}

impl Throttle {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.rate_limit, config.rate_window)
    }

    /// Count one invocation, failing once the window's budget is spent
    pub fn check(&self, operation: AdminOperation, caller: &str) -> Result<()> {
        let now = Instant::now();
        let key = (operation, caller.trim().to_lowercase());

        let mut entry = self.windows.entry(key).or_insert_with(|| Window::new(now));
        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window::new(now);
        }

        if entry.hits >= self.limit {
            let retry_after = self.window.saturating_sub(now.duration_since(entry.started));
            warn!(%operation, caller, "Rate limit exceeded");
            return Err(AccessError::RateLimited { operation, retry_after });
        }

        entry.hits += 1;
        Ok(())
    }

    /// Drop windows that have fully elapsed
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let window = self.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started) < window);
    }

    /// Number of live windows
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }

    /// Periodically purge expired windows in the background
    pub fn spawn_janitor(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let throttle = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                throttle.purge_expired();
                debug!(tracked = throttle.tracked(), "Throttle windows purged");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_limit_within_window() {
        let throttle = Throttle::new(10, Duration::from_secs(60));

        for _ in 0..10 {
            throttle.check(AdminOperation::GrantEarlyAccess, "staff@x.com").unwrap();
        }

        let err = throttle
            .check(AdminOperation::GrantEarlyAccess, "staff@x.com")
            .unwrap_err();
        assert_eq!(
            err,
            AccessError::RateLimited {
                operation: AdminOperation::GrantEarlyAccess,
                retry_after: Duration::from_secs(60),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let throttle = Throttle::new(2, Duration::from_secs(60));
        throttle.check(AdminOperation::RevokeEarlyAccess, "a@x.com").unwrap();
        throttle.check(AdminOperation::RevokeEarlyAccess, "a@x.com").unwrap();
        assert!(throttle.check(AdminOperation::RevokeEarlyAccess, "a@x.com").is_err());

        tokio::time::advance(Duration::from_secs(45)).await;
        let Err(AccessError::RateLimited { retry_after, .. }) =
            throttle.check(AdminOperation::RevokeEarlyAccess, "a@x.com")
        else {
            panic!("expected rate limit");
        };
        assert_eq!(retry_after, Duration::from_secs(15));

        tokio::time::advance(Duration::from_secs(15)).await;
        assert!(throttle.check(AdminOperation::RevokeEarlyAccess, "a@x.com").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_counters_are_independent() {
        let throttle = Throttle::new(1, Duration::from_secs(60));

        throttle.check(AdminOperation::GrantEarlyAccess, "a@x.com").unwrap();
        throttle.check(AdminOperation::RevokeEarlyAccess, "a@x.com").unwrap();
        throttle.check(AdminOperation::GrantEarlyAccess, "b@x.com").unwrap();
        assert!(throttle.check(AdminOperation::GrantEarlyAccess, "A@X.com").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let throttle = Throttle::new(5, Duration::from_secs(60));
        throttle.check(AdminOperation::ListEarlyAccessUsers, "a@x.com").unwrap();
        assert_eq!(throttle.tracked(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        throttle.purge_expired();
        assert_eq!(throttle.tracked(), 0);
    }
}
