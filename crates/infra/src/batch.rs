//! Batch lookups by id for GraphQL DataLoaders.

use sqlx::{postgres::PgRow, FromRow, PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{
    CropCategoryRow, CropCommodityRow, FarmProfileRow, FarmerProfileRow, LivestockSpeciesRow,
    UserRoleRow,
};
use crate::repos::{
    crop_categories, crop_commodities, farm_profiles, farmer_profiles, livestock_species,
    user_roles,
};
use crate::soft_delete::{SoftDeletable, NOT_DELETED};

/// A row type that can be fetched in bulk by primary key.
pub trait BatchRow:
    for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + Clone + 'static
{
    const TABLE: SoftDeletable;
    const COLUMNS: &'static str;

    fn id(&self) -> Uuid;
}

/// Load all live rows whose id is in `ids`. Deleted or unknown ids are
/// simply absent from the result.
pub async fn load_many<'e, R: BatchRow>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<R>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {} FROM {} WHERE id = ANY($1::uuid[]) AND {NOT_DELETED}",
        R::COLUMNS,
        R::TABLE.table_name()
    );
    sqlx::query_as::<_, R>(&sql)
        .bind(ids)
        .fetch_all(executor)
        .await
}

macro_rules! batch_row {
    ($row:ty, $table:expr, $columns:expr) => {
        impl BatchRow for $row {
            const TABLE: SoftDeletable = $table;
            const COLUMNS: &'static str = $columns;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

batch_row!(UserRoleRow, SoftDeletable::UserRoles, user_roles::COLUMNS);
batch_row!(FarmerProfileRow, SoftDeletable::FarmerProfiles, farmer_profiles::COLUMNS);
batch_row!(FarmProfileRow, SoftDeletable::FarmProfiles, farm_profiles::COLUMNS);
batch_row!(CropCategoryRow, SoftDeletable::CropCategories, crop_categories::COLUMNS);
batch_row!(CropCommodityRow, SoftDeletable::CropCommodities, crop_commodities::COLUMNS);
batch_row!(LivestockSpeciesRow, SoftDeletable::LivestockSpecies, livestock_species::COLUMNS);
