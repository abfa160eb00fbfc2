use async_graphql::{Error, Result, ID};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::auth::SessionUser;
use crate::gql::domains::activity_log::{log_and_publish, types::ActivityAction};
use crate::gql::error::{DbResultExt, GqlError, ResultExt};
use crate::state::AppState;
use infra::soft_delete::{self, SoftDeletable};

pub fn parse_id(id: &ID, label: &str) -> Result<Uuid> {
    Uuid::parse_str(id.as_str()).gql_err(&format!("Invalid {label} ID"))
}

/// Trim a required text field, rejecting empty values.
pub fn non_blank(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::new(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Like [`non_blank`] for fields that may be omitted in a partial update.
pub fn non_blank_opt(field: &str, value: Option<String>) -> Result<Option<String>> {
    value.map(|v| non_blank(field, v)).transpose()
}

/// Decode a tokenized mutation argument into its payload type.
pub fn decode_tokenized<T: DeserializeOwned>(state: &AppState, tokenized: &str) -> Result<T> {
    Ok(state.tokenizer().decode(tokenized).map_err(GqlError::from)?)
}

/// Sign a query result for the `...Tokenized` queries.
pub fn encode_tokenized<T: serde::Serialize>(state: &AppState, result: &T) -> Result<String> {
    Ok(state.tokenizer().encode(result).map_err(GqlError::from)?)
}

/// Fail with "`label` not found" unless a live row with `id` exists in `table`.
pub async fn ensure_live(
    state: &AppState,
    table: SoftDeletable,
    id: Uuid,
    label: &str,
) -> Result<()> {
    if !soft_delete::exists(&state.db, table, id).await.db()? {
        return Err(GqlError::not_found(label).into());
    }
    Ok(())
}

/// Soft-delete a row on behalf of `user` and record the deletion.
pub async fn soft_delete_and_log(
    state: &AppState,
    user: &SessionUser,
    table: SoftDeletable,
    id: Uuid,
    entity: &str,
    label: &str,
) -> Result<bool> {
    if !soft_delete::soft_delete(&state.db, table, id, user.id)
        .await
        .db()?
    {
        return Err(GqlError::not_found(label).into());
    }

    log_and_publish(
        &state.db,
        Some(user.id),
        ActivityAction::Delete,
        entity,
        Some(id),
        serde_json::json!({}),
    )
    .await;

    Ok(true)
}

/// Record a create or update performed by `user`.
pub async fn log_change(
    state: &AppState,
    user: &SessionUser,
    action: ActivityAction,
    entity: &str,
    id: Uuid,
) {
    log_and_publish(
        &state.db,
        Some(user.id),
        action,
        entity,
        Some(id),
        serde_json::json!({}),
    )
    .await;
}
