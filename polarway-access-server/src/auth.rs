//! Bearer token → Actor

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use polarway_access::Actor;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,
    pub email: String,
    /// Expiry (Unix timestamp)
    pub exp: usize,
}

pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Option<Actor> {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => Some(Actor::new(data.claims.email)),
            Err(e) => {
                debug!(error = %e, "Rejected bearer token");
                None
            }
        }
    }

    /// Resolve the caller from an `Authorization: Bearer` header
    pub fn actor_from_headers(&self, headers: &HeaderMap) -> Option<Actor> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.verify(token.trim())
    }
}
