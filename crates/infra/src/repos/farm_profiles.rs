use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::FarmProfileRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

pub(crate) const COLUMNS: &str = "id, farmer_profile_id, name, location, district, area_hectares, \
     latitude, longitude, tenure_type, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct FarmProfileFilter {
    pub farmer_profile_id: Option<Uuid>,
    pub district: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateFarmProfile {
    pub farmer_profile_id: Uuid,
    pub name: String,
    pub location: String,
    pub district: String,
    pub area_hectares: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tenure_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFarmProfile {
    pub farmer_profile_id: Option<Uuid>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub district: Option<String>,
    pub area_hectares: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tenure_type: Option<String>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &FarmProfileFilter) {
    if let Some(farmer_profile_id) = filter.farmer_profile_id {
        query.push(" AND farmer_profile_id = ");
        query.push_bind(farmer_profile_id);
    }
    if let Some(district) = &filter.district {
        query.push(" AND district = ");
        query.push_bind(district.clone());
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &FarmProfileFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<FarmProfileRow>> {
    let mut query =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM farm_profiles WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<FarmProfileRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &FarmProfileFilter,
) -> SqlxResult<i64> {
    let mut query =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM farm_profiles WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

/// Live farms of every farmer in `farmer_profile_ids`, ordered by name.
pub async fn list_by_farmers<'e>(
    executor: impl PgExecutor<'e>,
    farmer_profile_ids: &[Uuid],
) -> SqlxResult<Vec<FarmProfileRow>> {
    if farmer_profile_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {COLUMNS} FROM farm_profiles
         WHERE farmer_profile_id = ANY($1::uuid[]) AND {NOT_DELETED}
         ORDER BY name ASC"
    );
    sqlx::query_as::<_, FarmProfileRow>(&sql)
        .bind(farmer_profile_ids)
        .fetch_all(executor)
        .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<FarmProfileRow>> {
    let sql = format!("SELECT {COLUMNS} FROM farm_profiles WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, FarmProfileRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateFarmProfile,
    actor: Uuid,
) -> SqlxResult<FarmProfileRow> {
    let sql = format!(
        "INSERT INTO farm_profiles (farmer_profile_id, name, location, district, area_hectares,
             latitude, longitude, tenure_type, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, FarmProfileRow>(&sql)
        .bind(data.farmer_profile_id)
        .bind(data.name)
        .bind(data.location)
        .bind(data.district)
        .bind(data.area_hectares)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.tenure_type)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateFarmProfile,
    actor: Uuid,
) -> SqlxResult<Option<FarmProfileRow>> {
    let sql = format!(
        "UPDATE farm_profiles
         SET farmer_profile_id = COALESCE($2, farmer_profile_id),
             name = COALESCE($3, name),
             location = COALESCE($4, location),
             district = COALESCE($5, district),
             area_hectares = COALESCE($6, area_hectares),
             latitude = COALESCE($7, latitude),
             longitude = COALESCE($8, longitude),
             tenure_type = COALESCE($9, tenure_type),
             updated_by = $10,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, FarmProfileRow>(&sql)
        .bind(id)
        .bind(data.farmer_profile_id)
        .bind(data.name)
        .bind(data.location)
        .bind(data.district)
        .bind(data.area_hectares)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.tenure_type)
        .bind(actor)
        .fetch_optional(executor)
        .await
}
