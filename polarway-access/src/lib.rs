//! # Polarway Access
//!
//! Early-access administration for Polarway: staff grant, revoke and list
//! early-access cohort members, behind a rate limit and a staff check.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │        GraphQL (QueryRoot/MutationRoot)   │
//! ├───────────────────────────────────────────┤
//! │         EarlyAccessAdminService           │
//! │   AdminGuard: Throttle → StaffPolicy      │
//! ├─────────────────────┬─────────────────────┤
//! │   DirectoryActor    │     FlagsActor      │
//! │ (users by email,    │ (grants per user    │
//! │  find-or-create)    │  and access type)   │
//! └─────────────────────┴─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use polarway_access::{AccessConfig, Actor, EarlyAccessAdminService, EarlyAccessType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let admin = EarlyAccessAdminService::in_memory(&AccessConfig::new());
//!     let staff = Actor::new("ops@polarway.dev");
//!
//!     let grant_id = admin
//!         .service
//!         .grant_early_access(&staff, "pilot@example.com", EarlyAccessType::Ai)
//!         .await?;
//!     assert!(grant_id >= 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Staff guard**: one predicate (rate limit, then staff check) before every operation
//! - **Lazy provisioning**: granting to an unknown email creates an unregistered user
//! - **Idempotent grants**: re-granting returns the existing grant id
//! - **Explicit scopes**: listings carry a [`ViewScope`] for nested field visibility
//! - **Railway Programming**: All operations return `Result<T, AccessError>`

pub mod config;
pub mod directory;
pub mod error;
pub mod flags;
pub mod guard;
pub mod service;
pub mod throttle;
pub mod types;

#[cfg(feature = "graphql")]
pub mod graphql;

// Re-exports for convenience
pub use config::AccessConfig;
pub use error::{AccessError, Result};
pub use guard::{AdminGuard, AdminScope};
pub use service::{EarlyAccessAdminService, InMemoryAdmin};
pub use throttle::Throttle;
pub use types::{
    sanitize, Actor, AdminOperation, EarlyAccessGrant, EarlyAccessType, ScopedUsers,
    SubscriptionTier, UserRecord, UserSummary, ViewScope,
};

#[cfg(feature = "graphql")]
pub use graphql::{build_schema, AccessSchema};
