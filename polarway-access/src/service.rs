//! EarlyAccessAdminService — staff-gated early-access administration
//!
//! Every operation goes through [`AdminGuard`] first, then delegates to the
//! [`UserDirectory`] and [`FeatureFlags`] collaborators. Collaborator errors
//! are returned as-is.
//!
//! # Example
//!
//! ```rust,no_run
//! use polarway_access::{AccessConfig, Actor, EarlyAccessAdminService, EarlyAccessType};
//!
//! #[tokio::main]
//! async fn main() -> polarway_access::Result<()> {
//!     let config = AccessConfig::new().with_staff_domains(["polarway.dev"]);
//!     let admin = EarlyAccessAdminService::in_memory(&config);
//!     let staff = Actor::new("ops@polarway.dev");
//!
//!     let grant_id = admin
//!         .service
//!         .grant_early_access(&staff, "new@example.com", EarlyAccessType::App)
//!         .await?;
//!     let listing = admin.service.list_early_access_users(&staff).await?;
//!     let removed = admin.service.revoke_early_access(&staff, "new@example.com").await?;
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::config::AccessConfig;
use crate::directory::{DirectoryActor, DirectoryHandle, UserDirectory};
use crate::error::{AccessError, Result};
use crate::flags::{FeatureFlags, FlagsActor, FlagsHandle};
use crate::guard::AdminGuard;
use crate::throttle::Throttle;
use crate::types::{
    normalize_email, sanitize, Actor, AdminOperation, EarlyAccessType, ScopedUsers, ViewScope,
};

/// Staff-only early-access administration
#[derive(Clone)]
pub struct EarlyAccessAdminService {
    directory: Arc<dyn UserDirectory>,
    flags: Arc<dyn FeatureFlags>,
    guard: AdminGuard,
}

/// Service wired to the in-process actors, with handles kept for seeding
pub struct InMemoryAdmin {
    pub service: EarlyAccessAdminService,
    pub directory: DirectoryHandle,
    pub flags: FlagsHandle,
    pub throttle: Arc<Throttle>,
}

impl EarlyAccessAdminService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        flags: Arc<dyn FeatureFlags>,
        throttle: Arc<Throttle>,
    ) -> Self {
        let guard = AdminGuard::new(Arc::clone(&flags), throttle);
        Self { directory, flags, guard }
    }

    /// Spawn directory and flag actors and wire a service over them
    pub fn in_memory(config: &AccessConfig) -> InMemoryAdmin {
        let directory = DirectoryActor::spawn(config);
        let flags = FlagsActor::spawn(config, Arc::new(directory.clone()));
        let throttle = Arc::new(Throttle::from_config(config));

        let service = Self::new(
            Arc::new(directory.clone()),
            Arc::new(flags.clone()),
            Arc::clone(&throttle),
        );

        InMemoryAdmin {
            service,
            directory,
            flags,
            throttle,
        }
    }

    /// Grant early access to `email`, provisioning an unregistered user if needed
    ///
    /// Returns the grant id. Granting the same type twice returns the same id.
    pub async fn grant_early_access(
        &self,
        actor: &Actor,
        email: &str,
        access_type: EarlyAccessType,
    ) -> Result<i64> {
        let scope = self.guard.authorize(actor, AdminOperation::GrantEarlyAccess)?;
        let email = normalize_email(email)?;

        let (user, created) = self.directory.find_or_create_unregistered(&email).await?;
        let grant_id = self.flags.add_grant(&user.user_id, access_type).await?;

        info!(
            actor = scope.actor(),
            operation = %scope.operation(),
            user_id = %user.user_id,
            access_type = %access_type,
            created,
            grant_id,
            "Early access granted"
        );
        Ok(grant_id)
    }

    /// Revoke every early-access grant of `email`, returning how many were removed
    pub async fn revoke_early_access(&self, actor: &Actor, email: &str) -> Result<u64> {
        let scope = self.guard.authorize(actor, AdminOperation::RevokeEarlyAccess)?;
        // Lookup only: malformed input is an unknown user, not InvalidEmail
        let email = email.trim().to_lowercase();

        let user = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(AccessError::UserNotFound(email))?;
        let removed = self.flags.remove_grant(&user.user_id).await?;

        info!(
            actor = scope.actor(),
            operation = %scope.operation(),
            user_id = %user.user_id,
            removed,
            "Early access revoked"
        );
        Ok(removed)
    }

    /// Every user holding early access, sanitized and tagged with admin scope
    pub async fn list_early_access_users(&self, actor: &Actor) -> Result<ScopedUsers> {
        let scope = self.guard.authorize(actor, AdminOperation::ListEarlyAccessUsers)?;

        let users: Vec<_> = self
            .flags
            .list_granted()
            .await?
            .iter()
            .map(sanitize)
            .collect();

        info!(
            actor = scope.actor(),
            operation = %scope.operation(),
            count = users.len(),
            "Early access users listed"
        );
        Ok(ScopedUsers {
            scope: ViewScope::Admin,
            users,
        })
    }

    /// The caller's own sanitized record under a viewer scope
    ///
    /// Not an admin operation: no staff check and no rate limit. Empty when
    /// the caller has no directory entry.
    pub async fn viewer_profile(&self, actor: &Actor) -> Result<ScopedUsers> {
        let email = actor.email.trim().to_lowercase();
        let users = self
            .directory
            .find_by_email(&email)
            .await?
            .iter()
            .map(sanitize)
            .collect();

        Ok(ScopedUsers {
            scope: ViewScope::Viewer(email),
            users,
        })
    }
}
