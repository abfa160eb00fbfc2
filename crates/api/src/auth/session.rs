use chrono::{Duration, Utc};
use rand::{distr::Alphanumeric, RngExt};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;
use infra::models::UserSessionRow;

pub struct OpenedSession {
    pub token: String,
    pub session: UserSessionRow,
}

pub fn hash_secret(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Persist a new session for `user_id` and issue the JWT that carries it.
pub async fn open_session(
    state: &AppState,
    user_id: Uuid,
    username: &str,
) -> Result<OpenedSession, AppError> {
    let secret = generate_secret();
    let expires_at =
        Utc::now() + Duration::hours(state.auth_config().session_expiration_hours as i64);

    let session =
        infra::repos::user_sessions::create(&state.db, user_id, &hash_secret(&secret), expires_at)
            .await?;

    let claims = Claims::new(
        user_id,
        username.to_string(),
        session.id,
        secret,
        session.expires_at,
    );
    let token = state.jwt_service().create_token(&claims)?;

    tracing::info!(user_id = %user_id, session_id = %session.id, "Session opened");

    Ok(OpenedSession { token, session })
}

/// Whether `claims` still match the persisted session row.
pub fn claims_match_session(claims: &Claims, session: &UserSessionRow) -> bool {
    session.user_id.to_string() == claims.sub && hash_secret(&claims.jti) == session.token_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_for(user_id: Uuid, secret: &str) -> UserSessionRow {
        UserSessionRow {
            id: Uuid::new_v4(),
            user_id,
            token_hash: hash_secret(secret),
            expires_at: Utc::now() + Duration::hours(1),
            revoked_at: None,
            last_seen_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = hash_secret("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn generated_secrets_are_long_and_unique() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn claims_must_carry_the_session_secret_and_owner() {
        let user_id = Uuid::new_v4();
        let session = session_for(user_id, "secret-one");
        let claims = Claims::new(
            user_id,
            "officer".into(),
            session.id,
            "secret-one".into(),
            session.expires_at,
        );
        assert!(claims_match_session(&claims, &session));

        let forged = Claims { jti: "secret-two".into(), ..claims.clone() };
        assert!(!claims_match_session(&forged, &session));

        let other_user = Claims { sub: Uuid::new_v4().to_string(), ..claims };
        assert!(!claims_match_session(&other_user, &session));
    }
}
