use chrono::NaiveDate;
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::search::{contains_pattern, LIKE_ESCAPE};
use crate::{models::FarmerProfileRow, pagination::LimitOffset, soft_delete::NOT_DELETED};

pub(crate) const COLUMNS: &str = "id, reference_no, first_name, last_name, gender, date_of_birth, \
     phone, email, village, district, island, national_id, created_at, updated_at, created_by, updated_by";

#[derive(Debug, Clone, Default)]
pub struct FarmerProfileFilter {
    pub search: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateFarmerProfile {
    pub reference_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub village: String,
    pub district: String,
    pub island: Option<String>,
    pub national_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFarmerProfile {
    pub reference_no: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub island: Option<String>,
    pub national_id: Option<String>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &FarmerProfileFilter) {
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        query.push(" AND (LOWER(first_name) LIKE ");
        query.push_bind(pattern.clone());
        query.push(LIKE_ESCAPE);
        query.push(" OR LOWER(last_name) LIKE ");
        query.push_bind(pattern.clone());
        query.push(LIKE_ESCAPE);
        query.push(" OR LOWER(reference_no) LIKE ");
        query.push_bind(pattern);
        query.push(LIKE_ESCAPE);
        query.push(")");
    }

    if let Some(district) = &filter.district {
        query.push(" AND district = ");
        query.push_bind(district.clone());
    }
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &FarmerProfileFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<FarmerProfileRow>> {
    let mut query =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM farmer_profiles WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY last_name ASC, first_name ASC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<FarmerProfileRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &FarmerProfileFilter,
) -> SqlxResult<i64> {
    let mut query =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM farmer_profiles WHERE {NOT_DELETED}"));
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<FarmerProfileRow>> {
    let sql = format!("SELECT {COLUMNS} FROM farmer_profiles WHERE id = $1 AND {NOT_DELETED}");
    sqlx::query_as::<_, FarmerProfileRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Look up a live profile by reference number, optionally ignoring one id
/// (the profile being updated).
pub async fn find_by_reference<'e>(
    executor: impl PgExecutor<'e>,
    reference_no: &str,
    except_id: Option<Uuid>,
) -> SqlxResult<Option<FarmerProfileRow>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM farmer_profiles
         WHERE reference_no = $1 AND ($2::uuid IS NULL OR id <> $2) AND {NOT_DELETED}"
    );
    sqlx::query_as::<_, FarmerProfileRow>(&sql)
        .bind(reference_no)
        .bind(except_id)
        .fetch_optional(executor)
        .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateFarmerProfile,
    actor: Uuid,
) -> SqlxResult<FarmerProfileRow> {
    let sql = format!(
        "INSERT INTO farmer_profiles (reference_no, first_name, last_name, gender, date_of_birth,
             phone, email, village, district, island, national_id, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, FarmerProfileRow>(&sql)
        .bind(data.reference_no)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.gender)
        .bind(data.date_of_birth)
        .bind(data.phone)
        .bind(data.email)
        .bind(data.village)
        .bind(data.district)
        .bind(data.island)
        .bind(data.national_id)
        .bind(actor)
        .fetch_one(executor)
        .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateFarmerProfile,
    actor: Uuid,
) -> SqlxResult<Option<FarmerProfileRow>> {
    let sql = format!(
        "UPDATE farmer_profiles
         SET reference_no = COALESCE($2, reference_no),
             first_name = COALESCE($3, first_name),
             last_name = COALESCE($4, last_name),
             gender = COALESCE($5, gender),
             date_of_birth = COALESCE($6, date_of_birth),
             phone = COALESCE($7, phone),
             email = COALESCE($8, email),
             village = COALESCE($9, village),
             district = COALESCE($10, district),
             island = COALESCE($11, island),
             national_id = COALESCE($12, national_id),
             updated_by = $13,
             updated_at = NOW()
         WHERE id = $1 AND {NOT_DELETED}
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, FarmerProfileRow>(&sql)
        .bind(id)
        .bind(data.reference_no)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.gender)
        .bind(data.date_of_birth)
        .bind(data.phone)
        .bind(data.email)
        .bind(data.village)
        .bind(data.district)
        .bind(data.island)
        .bind(data.national_id)
        .bind(actor)
        .fetch_optional(executor)
        .await
}
