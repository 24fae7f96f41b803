//! FlagsActor — early-access grant store
//!
//! Grants live in the actor and are mutated one message at a time, which
//! keeps (user, type) unique without locks. User records are resolved
//! through the shared [`UserDirectory`] on the handle side.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::AccessConfig;
use crate::directory::UserDirectory;
use crate::error::{AccessError, Result};
use crate::types::{EarlyAccessGrant, EarlyAccessType, UserRecord};

use super::{FeatureFlags, StaffPolicy};

const GRANT_REASON: &str = "Early access user";

// ─── Messages ───

enum FlagsMsg {
    Add {
        user_id: String,
        access_type: EarlyAccessType,
        reply: oneshot::Sender<i64>,
    },
    Remove {
        user_id: String,
        reply: oneshot::Sender<u64>,
    },
    GrantedUserIds {
        reply: oneshot::Sender<Vec<String>>,
    },
    GrantsFor {
        user_id: String,
        reply: oneshot::Sender<Vec<EarlyAccessGrant>>,
    },
}

// ─── Actor ───

/// Flags actor — owns every active grant, ordered by grant id
pub struct FlagsActor {
    grants: Vec<EarlyAccessGrant>,
    next_id: i64,
    rx: mpsc::Receiver<FlagsMsg>,
}

impl FlagsActor {
    /// Spawn the flags actor; `directory` resolves users for listings
    pub fn spawn(config: &AccessConfig, directory: Arc<dyn UserDirectory>) -> FlagsHandle {
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let actor = Self {
            grants: Vec::new(),
            next_id: 1,
            rx,
        };

        tokio::spawn(actor.run());
        info!("FlagsActor spawned");
        FlagsHandle {
            tx,
            directory,
            staff: StaffPolicy::from_config(config),
        }
    }

    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                FlagsMsg::Add { user_id, access_type, reply } => {
                    let _ = reply.send(self.handle_add(user_id, access_type));
                }
                FlagsMsg::Remove { user_id, reply } => {
                    let _ = reply.send(self.handle_remove(&user_id));
                }
                FlagsMsg::GrantedUserIds { reply } => {
                    let _ = reply.send(self.granted_user_ids());
                }
                FlagsMsg::GrantsFor { user_id, reply } => {
                    let grants = self
                        .grants
                        .iter()
                        .filter(|g| g.user_id == user_id)
                        .cloned()
                        .collect();
                    let _ = reply.send(grants);
                }
            }
        }
        info!("FlagsActor stopped");
    }

    fn handle_add(&mut self, user_id: String, access_type: EarlyAccessType) -> i64 {
        if let Some(existing) = self
            .grants
            .iter()
            .find(|g| g.user_id == user_id && g.access_type == access_type)
        {
            debug!(grant_id = existing.grant_id, "Grant already active");
            return existing.grant_id;
        }

        let grant_id = self.next_id;
        self.next_id += 1;
        self.grants.push(EarlyAccessGrant {
            grant_id,
            user_id,
            access_type,
            reason: GRANT_REASON.to_string(),
            created_at: Utc::now().to_rfc3339(),
        });
        info!(grant_id, feature = access_type.feature_name(), "Grant added");
        grant_id
    }

    fn handle_remove(&mut self, user_id: &str) -> u64 {
        let before = self.grants.len();
        self.grants.retain(|g| g.user_id != user_id);
        let removed = (before - self.grants.len()) as u64;
        info!(user_id, removed, "Grants removed");
        removed
    }

    fn granted_user_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.grants
            .iter()
            .filter(|g| seen.insert(g.user_id.as_str()))
            .map(|g| g.user_id.clone())
            .collect()
    }
}

// ─── Handle ───

/// Thread-safe handle to the FlagsActor
#[derive(Clone)]
pub struct FlagsHandle {
    tx: mpsc::Sender<FlagsMsg>,
    directory: Arc<dyn UserDirectory>,
    staff: StaffPolicy,
}

impl FlagsHandle {
    async fn call<T>(&self, msg: impl FnOnce(oneshot::Sender<T>) -> FlagsMsg) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(msg(reply))
            .await
            .map_err(|_| AccessError::ActorUnavailable("FlagsActor".into()))?;
        rx.await
            .map_err(|_| AccessError::ActorUnavailable("FlagsActor dropped".into()))
    }
}

#[async_trait]
impl FeatureFlags for FlagsHandle {
    fn is_staff(&self, email: &str) -> bool {
        self.staff.is_staff(email)
    }

    async fn add_grant(&self, user_id: &str, access_type: EarlyAccessType) -> Result<i64> {
        if self.directory.find_by_id(user_id).await?.is_none() {
            return Err(AccessError::UserNotFound(user_id.to_string()));
        }
        let user_id = user_id.to_string();
        self.call(|reply| FlagsMsg::Add { user_id, access_type, reply }).await
    }

    async fn remove_grant(&self, user_id: &str) -> Result<u64> {
        let user_id = user_id.to_string();
        self.call(|reply| FlagsMsg::Remove { user_id, reply }).await
    }

    async fn list_granted(&self) -> Result<Vec<UserRecord>> {
        let ids = self.call(|reply| FlagsMsg::GrantedUserIds { reply }).await?;

        let mut users = Vec::with_capacity(ids.len());
        for user_id in ids {
            match self.directory.find_by_id(&user_id).await? {
                Some(user) => users.push(user),
                None => warn!(user_id = %user_id, "Grant held by unknown user"),
            }
        }
        Ok(users)
    }

    async fn grants_for(&self, user_id: &str) -> Result<Vec<EarlyAccessGrant>> {
        let user_id = user_id.to_string();
        self.call(|reply| FlagsMsg::GrantsFor { user_id, reply }).await
    }
}
