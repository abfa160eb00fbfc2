use async_graphql::{Context, Error, Object, Result};
use serde_json::json;

use crate::auth::password::PasswordService;
use crate::auth::session::open_session;
use crate::auth::require_session;
use crate::gql::domains::activity_log::{log_and_publish, types::ActivityAction};
use crate::gql::domains::users::{types::User, USER_ENTITY};
use crate::gql::error::{DbResultExt, GqlError};
use crate::state::AppState;
use infra::repos::{user_sessions, users};

use super::types::AuthPayload;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ── Queries ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// The user behind the current session.
    async fn current_user(&self, ctx: &Context<'_>) -> Result<User> {
        let session_user = require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let user = users::get_by_id(&state.db, session_user.id)
            .await
            .db()?
            .ok_or_else(|| GqlError::not_found("User"))?;

        Ok(user.into())
    }
}

// ── Mutations ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Log in with username and password, opening a new session.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;

        let credentials = users::get_credentials(&state.db, username.trim())
            .await
            .db()?
            .ok_or_else(|| Error::new(INVALID_CREDENTIALS))?;

        let valid = PasswordService::verify_blocking(password, credentials.password_hash)
            .await
            .map_err(GqlError::from)?;
        if !valid {
            tracing::info!(user_id = %credentials.id, "Rejected login with wrong password");
            return Err(Error::new(INVALID_CREDENTIALS));
        }

        if !credentials.is_active {
            return Err(Error::new("User account is disabled"));
        }

        let user = users::get_by_id(&state.db, credentials.id)
            .await
            .db()?
            .ok_or_else(|| Error::new(INVALID_CREDENTIALS))?;

        let opened = open_session(state, user.id, &user.username)
            .await
            .map_err(GqlError::from)?;

        log_and_publish(
            &state.db,
            Some(user.id),
            ActivityAction::Login,
            USER_ENTITY,
            Some(user.id),
            json!({ "via": "password", "sessionId": opened.session.id }),
        )
        .await;

        Ok(AuthPayload {
            token: opened.token,
            user: user.into(),
        })
    }

    /// Revoke the current session.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let session_user = require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let revoked = user_sessions::revoke(&state.db, session_user.session_id)
            .await
            .db()?;

        log_and_publish(
            &state.db,
            Some(session_user.id),
            ActivityAction::Logout,
            USER_ENTITY,
            Some(session_user.id),
            json!({ "sessionId": session_user.session_id }),
        )
        .await;

        tracing::info!(
            user_id = %session_user.id,
            session_id = %session_user.session_id,
            "Session closed"
        );

        Ok(revoked)
    }
}
