//! Access domain types — EarlyAccessType, UserRecord, UserSummary, ViewScope
//!
//! Serializable, cloneable, and cheap to pass around.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, Result};

/// Kind of early access a user is granted — a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[serde(rename_all = "lowercase")]
pub enum EarlyAccessType {
    App,
    Ai,
}

impl EarlyAccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Ai => "ai",
        }
    }

    /// Feature flag backing this cohort
    pub fn feature_name(&self) -> &'static str {
        match self {
            Self::App => "early_access",
            Self::Ai => "ai_early_access",
        }
    }
}

impl FromStr for EarlyAccessType {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "app" => Ok(Self::App),
            "ai" => Ok(Self::Ai),
            other => Err(AccessError::InvalidAccessType(other.to_string())),
        }
    }
}

impl fmt::Display for EarlyAccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription tiers matching pricing plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Hobbyist,
    Pioneer,
    Professional,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Hobbyist => "hobbyist",
            Self::Pioneer => "pioneer",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrative operations, each rate-limited independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminOperation {
    GrantEarlyAccess,
    RevokeEarlyAccess,
    ListEarlyAccessUsers,
}

impl AdminOperation {
    /// Name of the API field exposing the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrantEarlyAccess => "addToEarlyAccess",
            Self::RevokeEarlyAccess => "removeEarlyAccess",
            Self::ListEarlyAccessUsers => "earlyAccessUsers",
        }
    }
}

impl fmt::Display for AdminOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller identity, resolved by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub email: String,
}

impl Actor {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// User record — full user data as held by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub registered: bool,
    pub email_verified: bool,
    pub password_hash: Option<String>,
    pub subscription_tier: Option<SubscriptionTier>,
    pub created_at: String,
}

/// Options for provisioning a placeholder account
#[derive(Debug, Clone, Default)]
pub struct CreateUserOptions {
    /// Display name; defaults to the local part of the email
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// One early-access grant: (user, type) with a numeric handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyAccessGrant {
    pub grant_id: i64,
    pub user_id: String,
    pub access_type: EarlyAccessType,
    pub reason: String,
    pub created_at: String,
}

/// Sanitized user view returned to API callers
///
/// Credentials never leave the directory. The subscription tier is kept
/// private and only released through a [`ViewScope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub has_password: bool,
    pub registered: bool,
    #[serde(skip)]
    subscription_tier: Option<SubscriptionTier>,
}

impl UserSummary {
    /// Subscription tier, if `scope` is allowed to see it
    pub fn subscription(&self, scope: &ViewScope) -> Option<&SubscriptionTier> {
        if scope.can_view(&self.email) {
            self.subscription_tier.as_ref()
        } else {
            None
        }
    }
}

/// Redaction mapping from a directory record to an API view
pub fn sanitize(user: &UserRecord) -> UserSummary {
    UserSummary {
        id: user.user_id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        avatar_url: user.avatar_url.clone(),
        email_verified: user.email_verified,
        has_password: user.password_hash.is_some(),
        registered: user.registered,
        subscription_tier: user.subscription_tier.clone(),
    }
}

/// Authorization scope for nested resolution of user data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewScope {
    /// Privileged listing: every user's nested data is visible
    Admin,
    /// Ordinary caller: only their own nested data is visible
    Viewer(String),
}

impl ViewScope {
    pub fn can_view(&self, owner_email: &str) -> bool {
        match self {
            Self::Admin => true,
            Self::Viewer(email) => email.eq_ignore_ascii_case(owner_email),
        }
    }
}

/// Users returned together with the scope they may be resolved under
#[derive(Debug, Clone)]
pub struct ScopedUsers {
    pub scope: ViewScope,
    pub users: Vec<UserSummary>,
}

/// Trim, lowercase and shape-check an email address
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace) =>
        {
            Ok(email)
        }
        _ => Err(AccessError::InvalidEmail(raw.to_string())),
    }
}
