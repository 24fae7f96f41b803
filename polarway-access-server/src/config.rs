//! Server configuration — environment first, builder overrides

use std::time::Duration;

use anyhow::{bail, Context};
use polarway_access::AccessConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port (`PORT`, default 8080)
    pub port: u16,

    /// HS256 secret for bearer tokens (`POLARWAY_JWT_SECRET`)
    pub jwt_secret: String,

    /// How often expired rate-limit windows are purged
    pub janitor_interval: Duration,

    pub access: AccessConfig,
}

impl ServerConfig {
    /// Read `PORT` and `POLARWAY_JWT_SECRET`; a missing secret is fatal
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => 8080,
        };

        let jwt_secret = match lookup("POLARWAY_JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ => bail!("POLARWAY_JWT_SECRET must be set to sign and verify bearer tokens"),
        };

        Ok(Self {
            port,
            jwt_secret,
            janitor_interval: Duration::from_secs(300),
            access: AccessConfig::new(),
        })
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    pub fn with_access(mut self, access: AccessConfig) -> Self {
        self.access = access;
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_missing_jwt_secret_is_fatal() {
        assert!(ServerConfig::from_lookup(vars(&[])).is_err());
        assert!(ServerConfig::from_lookup(vars(&[("POLARWAY_JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn test_lookup_reads_port_and_secret() {
        let cfg = ServerConfig::from_lookup(vars(&[
            ("PORT", "9090"),
            ("POLARWAY_JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.jwt_secret, "s3cret");

        let bad_port = ServerConfig::from_lookup(vars(&[
            ("PORT", "eighty"),
            ("POLARWAY_JWT_SECRET", "s3cret"),
        ]));
        assert!(bad_port.is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let cfg = ServerConfig::from_lookup(vars(&[("POLARWAY_JWT_SECRET", "env-secret")]))
            .unwrap()
            .with_jwt_secret("my-secret")
            .with_access(AccessConfig::new().with_staff_domains(["x.com"]));

        assert_eq!(cfg.jwt_secret, "my-secret");
        assert_eq!(cfg.access.staff_domains, vec!["x.com"]);
        assert!(cfg.bind_addr().starts_with("0.0.0.0:"));
    }
}
