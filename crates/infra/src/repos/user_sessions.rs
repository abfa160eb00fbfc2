use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::UserSessionRow;

const COLUMNS: &str = "id, user_id, token_hash, expires_at, revoked_at, last_seen_at, created_at";

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> SqlxResult<UserSessionRow> {
    let sql = format!(
        "INSERT INTO user_sessions (user_id, token_hash, expires_at)
         VALUES ($1, $2, $3)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, UserSessionRow>(&sql)
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(executor)
        .await
}

/// Fetch a session that is neither revoked nor expired.
pub async fn find_active<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<UserSessionRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM user_sessions
         WHERE id = $1 AND revoked_at IS NULL AND expires_at > NOW()"
    );
    sqlx::query_as::<_, UserSessionRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn touch<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<()> {
    sqlx::query("UPDATE user_sessions SET last_seen_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn revoke<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query(
        "UPDATE user_sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Revoke every open session of a user (password change, deletion, deactivation).
pub async fn revoke_all_for_user<'e>(executor: impl PgExecutor<'e>, user_id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query(
        "UPDATE user_sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
    )
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
