//! GraphQL surface — `earlyAccessUsers`, `addToEarlyAccess`, `removeEarlyAccess`, `me`
//!
//! The transport attaches the caller as an [`Actor`] in request data.
//! Every admin field is rate-limited at 10 requests per minute per caller
//! (configurable through [`crate::AccessConfig`]).

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema};

use crate::error::AccessError;
use crate::service::EarlyAccessAdminService;
use crate::types::{Actor, EarlyAccessType, ScopedUsers, UserSummary, ViewScope};

pub type AccessSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the service attached as shared data
pub fn build_schema(service: EarlyAccessAdminService) -> AccessSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

impl ErrorExtensions for AccessError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let AccessError::RateLimited { retry_after, .. } = self {
                e.set("retryAfter", retry_after.as_secs());
            }
        })
    }
}

fn current_actor<'a>(ctx: &'a Context<'_>) -> Result<&'a Actor> {
    ctx.data_opt::<Actor>()
        .ok_or_else(|| AccessError::Unauthenticated.extend())
}

/// User as seen through the scope it was fetched under
pub struct UserType {
    summary: UserSummary,
    scope: ViewScope,
}

impl UserType {
    pub fn new(summary: UserSummary, scope: ViewScope) -> Self {
        Self { summary, scope }
    }
}

#[Object]
impl UserType {
    async fn id(&self) -> &str {
        &self.summary.id
    }

    async fn email(&self) -> &str {
        &self.summary.email
    }

    async fn name(&self) -> &str {
        &self.summary.name
    }

    async fn avatar_url(&self) -> Option<&str> {
        self.summary.avatar_url.as_deref()
    }

    async fn email_verified(&self) -> bool {
        self.summary.email_verified
    }

    async fn has_password(&self) -> bool {
        self.summary.has_password
    }

    async fn registered(&self) -> bool {
        self.summary.registered
    }

    /// Subscription tier; visible to the user themself or under admin scope
    async fn subscription(&self) -> Option<&str> {
        self.summary
            .subscription(&self.scope)
            .map(|tier| tier.as_str())
    }
}

fn into_user_types(listing: ScopedUsers) -> Vec<UserType> {
    let ScopedUsers { scope, users } = listing;
    users
        .into_iter()
        .map(|summary| UserType::new(summary, scope.clone()))
        .collect()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn early_access_users(&self, ctx: &Context<'_>) -> Result<Vec<UserType>> {
        let actor = current_actor(ctx)?;
        let service = ctx.data::<EarlyAccessAdminService>()?;

        let listing = service
            .list_early_access_users(actor)
            .await
            .map_err(|e| e.extend())?;
        Ok(into_user_types(listing))
    }

    /// The signed-in caller; `subscription` resolves for their own record only
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        let actor = current_actor(ctx)?;
        let service = ctx.data::<EarlyAccessAdminService>()?;

        let profile = service.viewer_profile(actor).await.map_err(|e| e.extend())?;
        Ok(into_user_types(profile).into_iter().next())
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn add_to_early_access(
        &self,
        ctx: &Context<'_>,
        email: String,
        #[graphql(name = "type")] access_type: EarlyAccessType,
    ) -> Result<i64> {
        let actor = current_actor(ctx)?;
        let service = ctx.data::<EarlyAccessAdminService>()?;

        service
            .grant_early_access(actor, &email, access_type)
            .await
            .map_err(|e| e.extend())
    }

    async fn remove_early_access(&self, ctx: &Context<'_>, email: String) -> Result<u64> {
        let actor = current_actor(ctx)?;
        let service = ctx.data::<EarlyAccessAdminService>()?;

        service
            .revoke_early_access(actor, &email)
            .await
            .map_err(|e| e.extend())
    }
}
