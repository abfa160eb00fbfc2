use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::LivestockRecordRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

const COLUMNS: &str = "id, farm_profile_id, species_id, head_count, record_date, notes, \
     created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct LivestockRecordFilter {
    pub farm_profile_id: Option<Uuid>,
    pub species_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateLivestockRecord {
    pub farm_profile_id: Uuid,
    pub species_id: Uuid,
    pub head_count: i32,
    pub record_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateLivestockRecord {
    pub species_id: Option<Uuid>,
    pub head_count: Option<i32>,
    pub record_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &LivestockRecordFilter) {
    if let Some(farm_profile_id) = filter.farm_profile_id {
        query.push(" AND farm_profile_id = ");
        query.push_bind(farm_profile_id);
    }
    if let Some(species_id) = filter.species_id {
        query.push(" AND species_id = ");
        query.push_bind(species_id);
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &LivestockRecordFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<LivestockRecordRow>> {
    let mut query =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM livestock_records WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY record_date DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<LivestockRecordRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &LivestockRecordFilter,
) -> SqlxResult<i64> {
    let mut query =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM livestock_records WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<LivestockRecordRow>> {
    let sql = format!("SELECT {COLUMNS} FROM livestock_records WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, LivestockRecordRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateLivestockRecord,
    actor: Uuid,
) -> SqlxResult<LivestockRecordRow> {
    let sql = format!(
        "INSERT INTO livestock_records (farm_profile_id, species_id, head_count, record_date, notes,
             created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $6)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, LivestockRecordRow>(&sql)
        .bind(data.farm_profile_id)
        .bind(data.species_id)
        .bind(data.head_count)
        .bind(data.record_date)
        .bind(data.notes)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateLivestockRecord,
    actor: Uuid,
) -> SqlxResult<Option<LivestockRecordRow>> {
    let sql = format!(
        "UPDATE livestock_records
         SET species_id = COALESCE($2, species_id),
             head_count = COALESCE($3, head_count),
             record_date = COALESCE($4, record_date),
             notes = COALESCE($5, notes),
             updated_by = $6,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, LivestockRecordRow>(&sql)
        .bind(id)
        .bind(data.species_id)
        .bind(data.head_count)
        .bind(data.record_date)
        .bind(data.notes)
        .bind(actor)
        .fetch_optional(executor)
        .await
}
