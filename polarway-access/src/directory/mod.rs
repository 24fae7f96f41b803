//! User directory — email lookup and placeholder provisioning

pub mod actor;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CreateUserOptions, UserRecord};

pub use actor::{DirectoryActor, DirectoryHandle};

/// Lookup and provisioning of user accounts
///
/// Emails passed in are expected to be normalized
/// (see [`crate::types::normalize_email`]).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Create an unregistered account; fails if the email is taken
    async fn create_unregistered(
        &self,
        email: &str,
        options: CreateUserOptions,
    ) -> Result<UserRecord>;

    /// Atomic lookup-or-create. The flag is `true` when a user was created.
    async fn find_or_create_unregistered(&self, email: &str) -> Result<(UserRecord, bool)>;
}
