use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::search::{contains_pattern, LIKE_ESCAPE};
use crate::{models::UserRoleRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

pub(crate) const COLUMNS: &str =
    "id, name, description, privileges, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct UserRoleFilter {
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateUserRole {
    pub name: String,
    pub description: Option<String>,
    pub privileges: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserRole {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privileges: Option<Vec<String>>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &UserRoleFilter) {
    if let Some(search) = &filter.search {
        query.push(" AND LOWER(name) LIKE ");
        query.push_bind(contains_pattern(search));
        query.push(LIKE_ESCAPE);
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &UserRoleFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<UserRoleRow>> {
    let mut query =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM user_roles WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<UserRoleRow>().fetch_all(executor).await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &UserRoleFilter) -> SqlxResult<i64> {
    let mut query =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM user_roles WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<UserRoleRow>> {
    let sql = format!("SELECT {COLUMNS} FROM user_roles WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, UserRoleRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn get_by_name<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
) -> SqlxResult<Option<UserRoleRow>> {
    let sql =
        format!("SELECT {COLUMNS} FROM user_roles WHERE LOWER(name) = LOWER($1) AND {NOT_DELETED}");
    sqlx::query_as::<_, UserRoleRow>(&sql)
        .bind(name)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateUserRole,
    actor: Uuid,
) -> SqlxResult<UserRoleRow> {
    let sql = format!(
        "INSERT INTO user_roles (name, description, privileges, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $4)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, UserRoleRow>(&sql)
        .bind(data.name)
        .bind(data.description)
        .bind(data.privileges)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateUserRole,
    actor: Uuid,
) -> SqlxResult<Option<UserRoleRow>> {
    let sql = format!(
        "UPDATE user_roles
         SET name = COALESCE($2, name),
             description = COALESCE($3, description),
             privileges = COALESCE($4, privileges),
             updated_by = $5,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, UserRoleRow>(&sql)
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.privileges)
        .bind(actor)
        .fetch_optional(executor)
        .await
}

/// Number of live users still holding this role.
pub async fn count_assigned_users<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM users WHERE role_id = $1 AND {NOT_DELETED}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_one(executor)
        .await
}
