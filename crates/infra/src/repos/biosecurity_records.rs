use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::BiosecurityRecordRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

const COLUMNS: &str = "id, farm_profile_id, inspection_date, inspector_name, pest_or_disease, \
     finding, status, action_taken, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct BiosecurityRecordFilter {
    pub farm_profile_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateBiosecurityRecord {
    pub farm_profile_id: Uuid,
    pub inspection_date: NaiveDate,
    pub inspector_name: String,
    pub pest_or_disease: Option<String>,
    pub finding: String,
    pub status: String,
    pub action_taken: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBiosecurityRecord {
    pub inspection_date: Option<NaiveDate>,
    pub inspector_name: Option<String>,
    pub pest_or_disease: Option<String>,
    pub finding: Option<String>,
    pub status: Option<String>,
    pub action_taken: Option<String>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &BiosecurityRecordFilter) {
    if let Some(farm_profile_id) = filter.farm_profile_id {
        query.push(" AND farm_profile_id = ");
        query.push_bind(farm_profile_id);
    }
    if let Some(status) = &filter.status {
        query.push(" AND status = ");
        query.push_bind(status.clone());
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &BiosecurityRecordFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<BiosecurityRecordRow>> {
    let mut query = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM biosecurity_records WHERE {NOT_DELETED}"
    ));
    push_filters(&mut query, filter);
    query.push(" ORDER BY inspection_date DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<BiosecurityRecordRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &BiosecurityRecordFilter,
) -> SqlxResult<i64> {
    let mut query = QueryBuilder::new(format!(
        "SELECT COUNT(*) FROM biosecurity_records WHERE {NOT_DELETED}"
    ));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<BiosecurityRecordRow>> {
    let sql = format!("SELECT {COLUMNS} FROM biosecurity_records WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, BiosecurityRecordRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateBiosecurityRecord,
    actor: Uuid,
) -> SqlxResult<BiosecurityRecordRow> {
    let sql = format!(
        "INSERT INTO biosecurity_records (farm_profile_id, inspection_date, inspector_name,
             pest_or_disease, finding, status, action_taken, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, BiosecurityRecordRow>(&sql)
        .bind(data.farm_profile_id)
        .bind(data.inspection_date)
        .bind(data.inspector_name)
        .bind(data.pest_or_disease)
        .bind(data.finding)
        .bind(data.status)
        .bind(data.action_taken)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateBiosecurityRecord,
    actor: Uuid,
) -> SqlxResult<Option<BiosecurityRecordRow>> {
    let sql = format!(
        "UPDATE biosecurity_records
         SET inspection_date = COALESCE($2, inspection_date),
             inspector_name = COALESCE($3, inspector_name),
             pest_or_disease = COALESCE($4, pest_or_disease),
             finding = COALESCE($5, finding),
             status = COALESCE($6, status),
             action_taken = COALESCE($7, action_taken),
             updated_by = $8,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, BiosecurityRecordRow>(&sql)
        .bind(id)
        .bind(data.inspection_date)
        .bind(data.inspector_name)
        .bind(data.pest_or_disease)
        .bind(data.finding)
        .bind(data.status)
        .bind(data.action_taken)
        .bind(actor)
        .fetch_optional(executor)
        .await
}
