//! First-run administrator account.

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::auth::password::PasswordService;
use crate::state::AppState;
use infra::repos::{user_roles, users, CreateUserData};

/// Role seeded by the initial migration with the wildcard privilege.
pub const ADMIN_ROLE_NAME: &str = "Administrator";

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl BootstrapAdmin {
    /// `Some` only when both `BOOTSTRAP_ADMIN_USERNAME` and
    /// `BOOTSTRAP_ADMIN_PASSWORD` are set and non-empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let username = lookup("BOOTSTRAP_ADMIN_USERNAME").filter(|v| !v.trim().is_empty())?;
        let password = lookup("BOOTSTRAP_ADMIN_PASSWORD").filter(|v| !v.is_empty())?;
        Some(Self {
            username: username.trim().to_string(),
            password,
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Create the administrator when the database has no live users yet.
/// Returns the new user's id, or `None` when nothing was created.
pub async fn ensure_admin(state: &AppState, admin: BootstrapAdmin) -> Result<Option<Uuid>> {
    if users::count_live(&state.db).await? > 0 {
        tracing::debug!("Users already exist; skipping bootstrap administrator");
        return Ok(None);
    }

    let Some(role) = user_roles::get_by_name(&state.db, ADMIN_ROLE_NAME).await? else {
        tracing::warn!("{ADMIN_ROLE_NAME} role is missing; bootstrap administrator not created");
        return Ok(None);
    };

    PasswordService::validate_password_strength(&admin.password)
        .context("BOOTSTRAP_ADMIN_PASSWORD is too weak")?;
    let password_hash = PasswordService::hash_blocking(admin.password).await?;

    let user = users::create(
        &state.db,
        CreateUserData {
            username: admin.username,
            full_name: ADMIN_ROLE_NAME.to_string(),
            email: None,
            password_hash,
            role_id: role.id,
        },
        None,
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Bootstrap administrator created");
    Ok(Some(user.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_variables_are_required() {
        let only_user = BootstrapAdmin::from_lookup(|k| {
            (k == "BOOTSTRAP_ADMIN_USERNAME").then(|| "admin".to_string())
        });
        assert!(only_user.is_none());

        let both = BootstrapAdmin::from_lookup(|k| match k {
            "BOOTSTRAP_ADMIN_USERNAME" => Some(" admin ".to_string()),
            "BOOTSTRAP_ADMIN_PASSWORD" => Some("change-me-now".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(both.username, "admin");
    }
}
