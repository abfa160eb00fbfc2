use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::ProductionRecordRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

const COLUMNS: &str = "id, farm_profile_id, commodity_id, period_start, period_end, \
     area_planted_hectares, quantity, unit, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct ProductionRecordFilter {
    pub farm_profile_id: Option<Uuid>,
    pub commodity_id: Option<Uuid>,
    /// Records whose period overlaps this calendar year.
    pub year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CreateProductionRecord {
    pub farm_profile_id: Uuid,
    pub commodity_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub area_planted_hectares: Option<f64>,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductionRecord {
    pub commodity_id: Option<Uuid>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub area_planted_hectares: Option<f64>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductionRecordFilter) {
    if let Some(farm_profile_id) = filter.farm_profile_id {
        query.push(" AND farm_profile_id = ");
        query.push_bind(farm_profile_id);
    }
    if let Some(commodity_id) = filter.commodity_id {
        query.push(" AND commodity_id = ");
        query.push_bind(commodity_id);
    }
    if let Some(year) = filter.year {
        query.push(" AND EXTRACT(YEAR FROM period_start)::int <= ");
        query.push_bind(year);
        query.push(" AND EXTRACT(YEAR FROM period_end)::int >= ");
        query.push_bind(year);
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ProductionRecordFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<ProductionRecordRow>> {
    let mut query =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM production_records WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY period_start DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<ProductionRecordRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ProductionRecordFilter,
) -> SqlxResult<i64> {
    let mut query = QueryBuilder::new(format!(
        "SELECT COUNT(*) FROM production_records WHERE {NOT_DELETED}"
    ));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<ProductionRecordRow>> {
    let sql = format!("SELECT {COLUMNS} FROM production_records WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, ProductionRecordRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateProductionRecord,
    actor: Uuid,
) -> SqlxResult<ProductionRecordRow> {
    let sql = format!(
        "INSERT INTO production_records (farm_profile_id, commodity_id, period_start, period_end,
             area_planted_hectares, quantity, unit, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ProductionRecordRow>(&sql)
        .bind(data.farm_profile_id)
        .bind(data.commodity_id)
        .bind(data.period_start)
        .bind(data.period_end)
        .bind(data.area_planted_hectares)
        .bind(data.quantity)
        .bind(data.unit)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateProductionRecord,
    actor: Uuid,
) -> SqlxResult<Option<ProductionRecordRow>> {
    let sql = format!(
        "UPDATE production_records
         SET commodity_id = COALESCE($2, commodity_id),
             period_start = COALESCE($3, period_start),
             period_end = COALESCE($4, period_end),
             area_planted_hectares = COALESCE($5, area_planted_hectares),
             quantity = COALESCE($6, quantity),
             unit = COALESCE($7, unit),
             updated_by = $8,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ProductionRecordRow>(&sql)
        .bind(id)
        .bind(data.commodity_id)
        .bind(data.period_start)
        .bind(data.period_end)
        .bind(data.area_planted_hectares)
        .bind(data.quantity)
        .bind(data.unit)
        .bind(actor)
        .fetch_optional(executor)
        .await
}
