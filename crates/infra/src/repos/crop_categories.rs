use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::CropCategoryRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

pub(crate) const COLUMNS: &str =
    "id, code, name, description, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone)]
pub struct CreateCropCategory {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCropCategory {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    page: LimitOffset,
) -> SqlxResult<Vec<CropCategoryRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM crop_categories WHERE {NOT_DELETED}
         ORDER BY name ASC LIMIT $1 OFFSET $2"
    );
    sqlx::query_as::<_, CropCategoryRow>(&sql)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(executor)
        .await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM crop_categories WHERE {NOT_DELETED}");
    sqlx::query_scalar::<_, i64>(&sql).fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<CropCategoryRow>> {
    let sql = format!("SELECT {COLUMNS} FROM crop_categories WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, CropCategoryRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_code<'e>(
    executor: impl PgExecutor<'e>,
    code: &str,
    except_id: Option<Uuid>,
) -> SqlxResult<Option<CropCategoryRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM crop_categories
         WHERE code = $1 AND ($2::uuid IS NULL OR id <> $2) AND {NOT_DELETED}"
    );
    sqlx::query_as::<_, CropCategoryRow>(&sql)
        .bind(code)
        .bind(except_id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateCropCategory,
    actor: Uuid,
) -> SqlxResult<CropCategoryRow> {
    let sql = format!(
        "INSERT INTO crop_categories (code, name, description, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $4)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, CropCategoryRow>(&sql)
        .bind(data.code)
        .bind(data.name)
        .bind(data.description)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateCropCategory,
    actor: Uuid,
) -> SqlxResult<Option<CropCategoryRow>> {
    let sql = format!(
        "UPDATE crop_categories
         SET code = COALESCE($2, code),
             name = COALESCE($3, name),
             description = COALESCE($4, description),
             updated_by = $5,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, CropCategoryRow>(&sql)
        .bind(id)
        .bind(data.code)
        .bind(data.name)
        .bind(data.description)
        .bind(actor)
        .fetch_optional(executor)
        .await
}

pub async fn count_live_commodities<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<i64> {
    let sql =
        format!("SELECT COUNT(*) FROM crop_commodities WHERE category_id = $1 AND {NOT_DELETED}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_one(executor)
        .await
}
