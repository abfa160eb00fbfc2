use anyhow::{bail, Context, Result};
use std::env;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Signs and verifies tokenized GraphQL payloads. Dashboard clients hold
    /// it, so it never authenticates anyone.
    pub tokenize_secret: String,
    /// Verifies portal tokens presented to `/callback`. `None` disables SSO.
    pub sso_secret: Option<String>,
    pub session_expiration_hours: u64,
    pub dashboard_url: String,
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|s| !s.is_empty())
        .with_context(|| format!("{key} must be set"))
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        let tokenize_secret = required(&lookup, "TOKENIZE_SECRET")?;
        let sso_secret = lookup("SSO_SECRET").filter(|s| !s.is_empty());

        if tokenize_secret == jwt_secret {
            bail!("TOKENIZE_SECRET must differ from JWT_SECRET");
        }
        if sso_secret.as_deref() == Some(tokenize_secret.as_str()) {
            bail!("SSO_SECRET must differ from TOKENIZE_SECRET");
        }

        Ok(Self {
            jwt_secret,
            tokenize_secret,
            sso_secret,
            session_expiration_hours: lookup("SESSION_EXPIRATION_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            dashboard_url: lookup("DASHBOARD_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }
}
