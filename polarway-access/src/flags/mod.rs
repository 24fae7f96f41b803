//! Feature flags — early-access cohorts and staff membership

pub mod actor;
pub mod staff;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EarlyAccessGrant, EarlyAccessType, UserRecord};

pub use actor::{FlagsActor, FlagsHandle};
pub use staff::StaffPolicy;

/// Per-user early-access membership store
#[async_trait]
pub trait FeatureFlags: Send + Sync {
    fn is_staff(&self, email: &str) -> bool;

    /// Grant `access_type` to a user. Granting twice returns the existing id.
    async fn add_grant(&self, user_id: &str, access_type: EarlyAccessType) -> Result<i64>;

    /// Remove every grant held by a user, returning how many were removed
    async fn remove_grant(&self, user_id: &str) -> Result<u64>;

    /// Distinct users holding at least one grant, oldest grant first
    async fn list_granted(&self) -> Result<Vec<UserRecord>>;

    async fn grants_for(&self, user_id: &str) -> Result<Vec<EarlyAccessGrant>>;
}
