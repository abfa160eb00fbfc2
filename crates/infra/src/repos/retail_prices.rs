use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::RetailPriceRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

const COLUMNS: &str = "id, commodity_id, market, price, unit, price_date, \
     created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct RetailPriceFilter {
    pub commodity_id: Option<Uuid>,
    pub market: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CreateRetailPrice {
    pub commodity_id: Uuid,
    pub market: String,
    pub price: f64,
    pub unit: String,
    pub price_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRetailPrice {
    pub commodity_id: Option<Uuid>,
    pub market: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub price_date: Option<NaiveDate>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &RetailPriceFilter) {
    if let Some(commodity_id) = filter.commodity_id {
        query.push(" AND commodity_id = ");
        query.push_bind(commodity_id);
    }
    if let Some(market) = &filter.market {
        query.push(" AND LOWER(market) = ");
        query.push_bind(market.to_lowercase());
    }
    if let Some(from) = filter.from {
        query.push(" AND price_date >= ");
        query.push_bind(from);
    }
    if let Some(to) = filter.to {
        query.push(" AND price_date <= ");
        query.push_bind(to);
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &RetailPriceFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<RetailPriceRow>> {
    let mut query =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM retail_prices WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY price_date DESC, created_at DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<RetailPriceRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &RetailPriceFilter,
) -> SqlxResult<i64> {
    let mut query =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM retail_prices WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<RetailPriceRow>> {
    let sql = format!("SELECT {COLUMNS} FROM retail_prices WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, RetailPriceRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateRetailPrice,
    actor: Uuid,
) -> SqlxResult<RetailPriceRow> {
    let sql = format!(
        "INSERT INTO retail_prices (commodity_id, market, price, unit, price_date, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $6)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, RetailPriceRow>(&sql)
        .bind(data.commodity_id)
        .bind(data.market)
        .bind(data.price)
        .bind(data.unit)
        .bind(data.price_date)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateRetailPrice,
    actor: Uuid,
) -> SqlxResult<Option<RetailPriceRow>> {
    let sql = format!(
        "UPDATE retail_prices
         SET commodity_id = COALESCE($2, commodity_id),
             market = COALESCE($3, market),
             price = COALESCE($4, price),
             unit = COALESCE($5, unit),
             price_date = COALESCE($6, price_date),
             updated_by = $7,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, RetailPriceRow>(&sql)
        .bind(id)
        .bind(data.commodity_id)
        .bind(data.market)
        .bind(data.price)
        .bind(data.unit)
        .bind(data.price_date)
        .bind(actor)
        .fetch_optional(executor)
        .await
}
