//! AdminGuard — the one authorization predicate in front of every admin operation
//!
//! Order matters: the rate limit is counted first, so rejected callers
//! still spend their budget, then staff membership is checked.

use std::sync::Arc;

use tracing::warn;

use crate::error::{AccessError, Result};
use crate::flags::FeatureFlags;
use crate::throttle::Throttle;
use crate::types::{Actor, AdminOperation};

/// Proof that an actor passed the guard for one operation
///
/// Only [`AdminGuard::authorize`] can construct it.
#[derive(Debug)]
pub struct AdminScope {
    actor_email: String,
    operation: AdminOperation,
}

impl AdminScope {
    pub fn actor(&self) -> &str {
        &self.actor_email
    }

    pub fn operation(&self) -> AdminOperation {
        self.operation
    }
}

#[derive(Clone)]
pub struct AdminGuard {
    flags: Arc<dyn FeatureFlags>,
    throttle: Arc<Throttle>,
}

impl AdminGuard {
    pub fn new(flags: Arc<dyn FeatureFlags>, throttle: Arc<Throttle>) -> Self {
        Self { flags, throttle }
    }

    pub fn authorize(&self, actor: &Actor, operation: AdminOperation) -> Result<AdminScope> {
        self.throttle.check(operation, &actor.email)?;

        if !self.flags.is_staff(&actor.email) {
            warn!(actor = %actor.email, %operation, "Non-staff admin attempt");
            return Err(AccessError::PermissionDenied);
        }

        Ok(AdminScope {
            actor_email: actor.email.clone(),
            operation,
        })
    }
}
