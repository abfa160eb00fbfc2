//! Single sign-on entry point.
//!
//! The ministry portal redirects an authenticated officer to
//! `/callback?token=<jwt>`, signed with `SSO_SECRET` and carrying the
//! officer's `username`. A matching live, active account gets a fresh
//! session and is sent on to the dashboard with its bearer token.
//! Without `SSO_SECRET` every request gets a 404.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::session::open_session;
use crate::auth::TokenCodec;
use crate::error::AppError;
use crate::gql::domains::activity_log::{log_and_publish, types::ActivityAction};
use crate::gql::domains::users::USER_ENTITY;
use crate::state::AppState;
use infra::repos::users;

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub token: String,
}

/// Claims of the portal token. `exp` is enforced by the codec when present.
#[derive(Debug, Deserialize)]
struct PortalClaims {
    username: String,
}

/// Verify a portal token. Without an SSO secret the endpoint behaves as if
/// it were not mounted.
fn decode_portal_token(codec: Option<&TokenCodec>, token: &str) -> Result<PortalClaims, AppError> {
    let codec =
        codec.ok_or_else(|| AppError::NotFound("Single sign-on is not enabled".to_string()))?;

    codec.decode(token).map_err(|e| {
        tracing::warn!("Rejected portal token: {e}");
        AppError::Unauthorized("Invalid or expired portal token".to_string())
    })
}

pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    let claims = decode_portal_token(state.sso_codec(), &query.token)?;

    let user = users::get_by_username(&state.db, claims.username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is disabled".to_string()));
    }

    let opened = open_session(&state, user.id, &user.username).await?;

    log_and_publish(
        &state.db,
        Some(user.id),
        ActivityAction::Login,
        USER_ENTITY,
        Some(user.id),
        json!({ "via": "sso", "sessionId": opened.session.id }),
    )
    .await;

    Ok(Redirect::to(&dashboard_redirect(
        &state.auth_config().dashboard_url,
        &opened.token,
    )))
}

fn dashboard_redirect(dashboard_url: &str, token: &str) -> String {
    format!(
        "{}/auth/callback?token={}",
        dashboard_url.trim_end_matches('/'),
        token
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn config(pairs: &[(&str, &str)]) -> AuthConfig {
        AuthConfig::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    fn sign(username: &str, secret: &str) -> String {
        encode(
            &Header::default(),
            &json!({ "username": username }),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn payload_secret_cannot_mint_portal_tokens() {
        let config = config(&[
            ("JWT_SECRET", "server"),
            ("TOKENIZE_SECRET", "browser"),
            ("SSO_SECRET", "portal"),
        ]);
        let codec = config.sso_secret.as_deref().map(TokenCodec::new);

        let forged = sign("admin", &config.tokenize_secret);
        let err = decode_portal_token(codec.as_ref(), &forged).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let genuine = sign("admin", "portal");
        let claims = decode_portal_token(codec.as_ref(), &genuine).unwrap();
        assert_eq!(claims.username, "admin");
    }

    #[test]
    fn sso_is_off_without_its_own_secret() {
        let config = config(&[("JWT_SECRET", "server"), ("TOKENIZE_SECRET", "browser")]);
        let codec = config.sso_secret.as_deref().map(TokenCodec::new);

        for secret in ["server", "browser"] {
            let err = decode_portal_token(codec.as_ref(), &sign("admin", secret)).unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }
    }

    #[test]
    fn redirect_joins_dashboard_and_token() {
        assert_eq!(
            dashboard_redirect("https://dash.example.gov/", "abc.def.ghi"),
            "https://dash.example.gov/auth/callback?token=abc.def.ghi"
        );
        assert_eq!(
            dashboard_redirect("http://localhost:3000", "t"),
            "http://localhost:3000/auth/callback?token=t"
        );
    }
}
