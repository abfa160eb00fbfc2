use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::LivestockSpeciesRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

pub(crate) const COLUMNS: &str =
    "id, name, description, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone)]
pub struct CreateLivestockSpecies {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLivestockSpecies {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    page: LimitOffset,
) -> SqlxResult<Vec<LivestockSpeciesRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM livestock_species WHERE {NOT_DELETED}
         ORDER BY name ASC LIMIT $1 OFFSET $2"
    );
    sqlx::query_as::<_, LivestockSpeciesRow>(&sql)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(executor)
        .await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM livestock_species WHERE {NOT_DELETED}");
    sqlx::query_scalar::<_, i64>(&sql).fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<LivestockSpeciesRow>> {
    let sql = format!("SELECT {COLUMNS} FROM livestock_species WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, LivestockSpeciesRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_name<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
    except_id: Option<Uuid>,
) -> SqlxResult<Option<LivestockSpeciesRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM livestock_species
         WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2) AND {NOT_DELETED}"
    );
    sqlx::query_as::<_, LivestockSpeciesRow>(&sql)
        .bind(name)
        .bind(except_id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateLivestockSpecies,
    actor: Uuid,
) -> SqlxResult<LivestockSpeciesRow> {
    let sql = format!(
        "INSERT INTO livestock_species (name, description, created_by, updated_by)
         VALUES ($1, $2, $3, $3)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, LivestockSpeciesRow>(&sql)
        .bind(data.name)
        .bind(data.description)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateLivestockSpecies,
    actor: Uuid,
) -> SqlxResult<Option<LivestockSpeciesRow>> {
    let sql = format!(
        "UPDATE livestock_species
         SET name = COALESCE($2, name),
             description = COALESCE($3, description),
             updated_by = $4,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, LivestockSpeciesRow>(&sql)
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(actor)
        .fetch_optional(executor)
        .await
}
