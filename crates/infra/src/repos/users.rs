use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::search::{contains_pattern, LIKE_ESCAPE};
use crate::{
    models::{UserCredentialsRow, UserRow},
    pagination::LimitOffset,
    soft_delete::NOT_DELETED,
};

const COLUMNS: &str =
    "id, username, full_name, email, role_id, is_active, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub role_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserData {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        query.push(" AND (LOWER(username) LIKE ");
        query.push_bind(pattern.clone());
        query.push(LIKE_ESCAPE);
        query.push(" OR LOWER(full_name) LIKE ");
        query.push_bind(pattern);
        query.push(LIKE_ESCAPE);
        query.push(")");
    }

    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(is_active);
    }

    if let Some(role_id) = filter.role_id {
        query.push(" AND role_id = ");
        query.push_bind(role_id);
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &UserFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<UserRow>> {
    let mut query = QueryBuilder::new(format!("SELECT {COLUMNS} FROM users WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY created_at DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<UserRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &UserFilter) -> SqlxResult<i64> {
    let mut query = QueryBuilder::new(format!("SELECT COUNT(*) FROM users WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn count_live<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<i64> {
    count(executor, &UserFilter::default()).await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<UserRow>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn get_by_username<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> SqlxResult<Option<UserRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM users WHERE LOWER(username) = LOWER($1) AND {NOT_DELETED}"
    );
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(username)
        .fetch_optional(executor)
        .await
}

pub async fn get_credentials<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> SqlxResult<Option<UserCredentialsRow>> {
    let sql = format!(
        "SELECT id, password_hash, is_active FROM users
         WHERE LOWER(username) = LOWER($1) AND {NOT_DELETED}"
    );
    sqlx::query_as::<_, UserCredentialsRow>(&sql)
        .bind(username)
        .fetch_optional(executor)
        .await
}

/// Create a user. `actor` is `None` only for the bootstrap administrator.
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateUserData,
    actor: Option<Uuid>,
) -> SqlxResult<UserRow> {
    let sql = format!(
        "INSERT INTO users (username, full_name, email, password_hash, role_id, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $6)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(data.username)
        .bind(data.full_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role_id)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateUserData,
    actor: Uuid,
) -> SqlxResult<Option<UserRow>> {
    let sql = format!(
        "UPDATE users
         SET full_name = COALESCE($2, full_name),
             email = COALESCE($3, email),
             role_id = COALESCE($4, role_id),
             is_active = COALESCE($5, is_active),
             updated_by = $6,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .bind(data.full_name)
        .bind(data.email)
        .bind(data.role_id)
        .bind(data.is_active)
        .bind(actor)
        .fetch_optional(executor)
        .await
}

pub async fn set_password_hash<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    password_hash: &str,
    actor: Uuid,
) -> SqlxResult<bool> {
    let sql = format!(
        "UPDATE users SET password_hash = $2, updated_by = $3, updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}"
    );
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(password_hash)
        .bind(actor)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
