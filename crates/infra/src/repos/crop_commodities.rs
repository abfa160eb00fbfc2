use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::search::{contains_pattern, LIKE_ESCAPE};
use crate::{
    models::{CropCommodityRow, VegetablePriceRow},
    pagination::LimitOffset,
    soft_delete::NOT_DELETED,
};

pub(crate) const COLUMNS: &str =
    "id, category_id, name, unit, scientific_name, created_at, updated_at, created_by, updated_by";

/// Category code whose commodities make up the public vegetable list.
pub const VEGETABLE_CATEGORY_CODE: &str = "VEGETABLES";

#[derive(Debug, Clone, Default)]
pub struct CropCommodityFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCropCommodity {
    pub category_id: Uuid,
    pub name: String,
    pub unit: String,
    pub scientific_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCropCommodity {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub scientific_name: Option<String>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &CropCommodityFilter) {
    if let Some(category_id) = filter.category_id {
        query.push(" AND category_id = ");
        query.push_bind(category_id);
    }
    if let Some(search) = &filter.search {
        query.push(" AND LOWER(name) LIKE ");
        query.push_bind(contains_pattern(search));
        query.push(LIKE_ESCAPE);
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &CropCommodityFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<CropCommodityRow>> {
    let mut query =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM crop_commodities WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<CropCommodityRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &CropCommodityFilter,
) -> SqlxResult<i64> {
    let mut query =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM crop_commodities WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<CropCommodityRow>> {
    let sql = format!("SELECT {COLUMNS} FROM crop_commodities WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, CropCommodityRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateCropCommodity,
    actor: Uuid,
) -> SqlxResult<CropCommodityRow> {
    let sql = format!(
        "INSERT INTO crop_commodities (category_id, name, unit, scientific_name, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, CropCommodityRow>(&sql)
        .bind(data.category_id)
        .bind(data.name)
        .bind(data.unit)
        .bind(data.scientific_name)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateCropCommodity,
    actor: Uuid,
) -> SqlxResult<Option<CropCommodityRow>> {
    let sql = format!(
        "UPDATE crop_commodities
         SET category_id = COALESCE($2, category_id),
             name = COALESCE($3, name),
             unit = COALESCE($4, unit),
             scientific_name = COALESCE($5, scientific_name),
             updated_by = $6,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, CropCommodityRow>(&sql)
        .bind(id)
        .bind(data.category_id)
        .bind(data.name)
        .bind(data.unit)
        .bind(data.scientific_name)
        .bind(actor)
        .fetch_optional(executor)
        .await
}

/// Live vegetable commodities with their most recent live retail price.
pub async fn list_vegetables_with_latest_price<'e>(
    executor: impl PgExecutor<'e>,
) -> SqlxResult<Vec<VegetablePriceRow>> {
    sqlx::query_as::<_, VegetablePriceRow>(
        r#"
        SELECT c.id AS commodity_id,
               c.name,
               c.unit,
               p.price AS latest_price,
               p.unit AS price_unit,
               p.market,
               p.price_date
        FROM crop_commodities c
        JOIN crop_categories cat ON cat.id = c.category_id AND cat.deleted_at IS NULL
        LEFT JOIN LATERAL (
            SELECT rp.price, rp.unit, rp.market, rp.price_date
            FROM retail_prices rp
            WHERE rp.commodity_id = c.id AND rp.deleted_at IS NULL
            ORDER BY rp.price_date DESC, rp.created_at DESC
            LIMIT 1
        ) p ON TRUE
        WHERE cat.code = $1 AND c.deleted_at IS NULL
        ORDER BY c.name ASC
        "#,
    )
    .bind(VEGETABLE_CATEGORY_CODE)
    .fetch_all(executor)
    .await
}
