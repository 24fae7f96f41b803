//! DirectoryActor — Tokio actor owning the in-memory user directory
//!
//! Every message is processed sequentially via an mpsc channel, so
//! lookup-then-create happens inside a single turn of the loop and two
//! concurrent grants for the same email can never provision two users.
//!
//! # Usage
//!
//! ```rust,no_run
//! use polarway_access::directory::{DirectoryActor, UserDirectory};
//! use polarway_access::AccessConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = DirectoryActor::spawn(&AccessConfig::new());
//!
//!     let (user, created) = handle.find_or_create_unregistered("new@example.com").await?;
//!     assert!(created && !user.registered);
//!
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AccessConfig;
use crate::error::{AccessError, Result};
use crate::types::{CreateUserOptions, SubscriptionTier, UserRecord};

use super::UserDirectory;

// ─── Actor Messages ───

enum DirectoryMsg {
    FindByEmail {
        email: String,
        reply: oneshot::Sender<Option<UserRecord>>,
    },
    FindById {
        user_id: String,
        reply: oneshot::Sender<Option<UserRecord>>,
    },
    CreateUnregistered {
        email: String,
        options: CreateUserOptions,
        reply: oneshot::Sender<Result<UserRecord>>,
    },
    FindOrCreate {
        email: String,
        reply: oneshot::Sender<(UserRecord, bool)>,
    },
    Register {
        email: String,
        name: String,
        password_hash: Option<String>,
        tier: Option<SubscriptionTier>,
        reply: oneshot::Sender<Result<UserRecord>>,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
}

// ─── Actor ───

/// Directory actor — owns user records keyed by id and email
pub struct DirectoryActor {
    users: HashMap<String, UserRecord>,
    by_email: HashMap<String, String>,
    rx: mpsc::Receiver<DirectoryMsg>,
}

impl DirectoryActor {
    /// Spawn the directory actor and return a handle for sending messages
    pub fn spawn(config: &AccessConfig) -> DirectoryHandle {
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let actor = Self {
            users: HashMap::new(),
            by_email: HashMap::new(),
            rx,
        };

        tokio::spawn(actor.run());
        info!("DirectoryActor spawned");
        DirectoryHandle { tx }
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                DirectoryMsg::FindByEmail { email, reply } => {
                    let _ = reply.send(self.lookup_email(&email).cloned());
                }
                DirectoryMsg::FindById { user_id, reply } => {
                    let _ = reply.send(self.users.get(&user_id).cloned());
                }
                DirectoryMsg::CreateUnregistered { email, options, reply } => {
                    let _ = reply.send(self.handle_create_unregistered(email, options));
                }
                DirectoryMsg::FindOrCreate { email, reply } => {
                    let _ = reply.send(self.handle_find_or_create(email));
                }
                DirectoryMsg::Register { email, name, password_hash, tier, reply } => {
                    let _ = reply.send(self.handle_register(email, name, password_hash, tier));
                }
                DirectoryMsg::Count { reply } => {
                    let _ = reply.send(self.users.len());
                }
            }
        }
        info!("DirectoryActor stopped");
    }

    // ─── Handler Implementations ───

    fn handle_create_unregistered(
        &mut self,
        email: String,
        options: CreateUserOptions,
    ) -> Result<UserRecord> {
        if self.by_email.contains_key(&email) {
            return Err(AccessError::UserAlreadyExists(email));
        }
        Ok(self.insert_placeholder(email, options))
    }

    fn handle_find_or_create(&mut self, email: String) -> (UserRecord, bool) {
        if let Some(user) = self.lookup_email(&email) {
            debug!(user_id = %user.user_id, "Existing user resolved");
            return (user.clone(), false);
        }
        (self.insert_placeholder(email, CreateUserOptions::default()), true)
    }

    fn handle_register(
        &mut self,
        email: String,
        name: String,
        password_hash: Option<String>,
        tier: Option<SubscriptionTier>,
    ) -> Result<UserRecord> {
        if self.by_email.contains_key(&email) {
            return Err(AccessError::UserAlreadyExists(email));
        }

        let user = UserRecord {
            user_id: Uuid::new_v4().to_string(),
            email,
            name,
            avatar_url: None,
            registered: true,
            email_verified: true,
            password_hash,
            subscription_tier: tier,
            created_at: Utc::now().to_rfc3339(),
        };
        info!(user_id = %user.user_id, "User registered");
        Ok(self.insert(user))
    }

    // ─── Helpers ───

    fn lookup_email(&self, email: &str) -> Option<&UserRecord> {
        self.by_email.get(email).and_then(|id| self.users.get(id))
    }

    fn insert_placeholder(&mut self, email: String, options: CreateUserOptions) -> UserRecord {
        let name = options
            .name
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        let user = UserRecord {
            user_id: Uuid::new_v4().to_string(),
            email,
            name,
            avatar_url: options.avatar_url,
            registered: false,
            email_verified: false,
            password_hash: None,
            subscription_tier: None,
            created_at: Utc::now().to_rfc3339(),
        };
        info!(user_id = %user.user_id, "Unregistered user provisioned");
        self.insert(user)
    }

    fn insert(&mut self, user: UserRecord) -> UserRecord {
        self.by_email.insert(user.email.clone(), user.user_id.clone());
        self.users.insert(user.user_id.clone(), user.clone());
        user
    }
}

// ─── Handle (client-facing API) ───

/// Thread-safe handle to communicate with the DirectoryActor
#[derive(Clone)]
pub struct DirectoryHandle {
    tx: mpsc::Sender<DirectoryMsg>,
}

impl DirectoryHandle {
    async fn call<T>(&self, msg: impl FnOnce(oneshot::Sender<T>) -> DirectoryMsg) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(msg(reply))
            .await
            .map_err(|_| AccessError::ActorUnavailable("DirectoryActor".into()))?;
        rx.await
            .map_err(|_| AccessError::ActorUnavailable("DirectoryActor dropped".into()))
    }

    /// Add a fully registered account (sign-up happens elsewhere)
    pub async fn register(
        &self,
        email: String,
        name: String,
        password_hash: Option<String>,
        tier: Option<SubscriptionTier>,
    ) -> Result<UserRecord> {
        self.call(|reply| DirectoryMsg::Register { email, name, password_hash, tier, reply })
            .await?
    }

    /// Number of user records
    pub async fn len(&self) -> Result<usize> {
        self.call(|reply| DirectoryMsg::Count { reply }).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

#[async_trait]
impl UserDirectory for DirectoryHandle {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email = email.to_string();
        self.call(|reply| DirectoryMsg::FindByEmail { email, reply }).await
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let user_id = user_id.to_string();
        self.call(|reply| DirectoryMsg::FindById { user_id, reply }).await
    }

    async fn create_unregistered(
        &self,
        email: &str,
        options: CreateUserOptions,
    ) -> Result<UserRecord> {
        let email = email.to_string();
        self.call(|reply| DirectoryMsg::CreateUnregistered { email, options, reply })
            .await?
    }

    async fn find_or_create_unregistered(&self, email: &str) -> Result<(UserRecord, bool)> {
        let email = email.to_string();
        self.call(|reply| DirectoryMsg::FindOrCreate { email, reply }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let handle = DirectoryActor::spawn(&AccessConfig::new());

        let (first, created) = handle.find_or_create_unregistered("new@x.com").await.unwrap();
        assert!(created);
        assert!(!first.registered);
        assert_eq!(first.name, "new");

        let (second, created) = handle.find_or_create_unregistered("new@x.com").await.unwrap();
        assert!(!created);
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(handle.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_find_or_create_provisions_once() {
        let handle = DirectoryActor::spawn(&AccessConfig::new());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move {
                    handle.find_or_create_unregistered("race@x.com").await.unwrap()
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap().1 {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(handle.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_unregistered_rejects_duplicates() {
        let handle = DirectoryActor::spawn(&AccessConfig::new());

        let opts = CreateUserOptions {
            name: Some("Placeholder".into()),
            avatar_url: None,
        };
        let user = handle.create_unregistered("dup@x.com", opts).await.unwrap();
        assert_eq!(user.name, "Placeholder");

        let again = handle
            .create_unregistered("dup@x.com", CreateUserOptions::default())
            .await;
        assert_eq!(again, Err(AccessError::UserAlreadyExists("dup@x.com".into())));
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let handle = DirectoryActor::spawn(&AccessConfig::new());
        assert!(handle.is_empty().await.unwrap());

        let user = handle
            .register(
                "alice@example.com".into(),
                "Alice".into(),
                Some("$argon2id$fake_hash".into()),
                Some(SubscriptionTier::Pioneer),
            )
            .await
            .unwrap();
        assert!(user.registered);

        let by_email = handle.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.user_id, user.user_id);

        let by_id = handle.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        assert!(handle.find_by_email("ghost@example.com").await.unwrap().is_none());
    }
}
