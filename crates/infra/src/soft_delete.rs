//! Soft deletion shared by every audited table.
//!
//! Rows are never removed; `deleted_at`/`deleted_by` are stamped instead and
//! every default read filters on [`NOT_DELETED`].

use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

/// Predicate appended to every default query.
pub const NOT_DELETED: &str = "deleted_at IS NULL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeletable {
    UserRoles,
    Users,
    FarmerProfiles,
    FarmProfiles,
    CropCategories,
    CropCommodities,
    LivestockSpecies,
    LivestockRecords,
    BiosecurityRecords,
    RetailPrices,
    ProductionRecords,
}

impl SoftDeletable {
    pub fn table_name(self) -> &'static str {
        match self {
            Self::UserRoles => "user_roles",
            Self::Users => "users",
            Self::FarmerProfiles => "farmer_profiles",
            Self::FarmProfiles => "farm_profiles",
            Self::CropCategories => "crop_categories",
            Self::CropCommodities => "crop_commodities",
            Self::LivestockSpecies => "livestock_species",
            Self::LivestockRecords => "livestock_records",
            Self::BiosecurityRecords => "biosecurity_records",
            Self::RetailPrices => "retail_prices",
            Self::ProductionRecords => "production_records",
        }
    }

    fn delete_sql(self) -> String {
        format!(
            "UPDATE {} SET deleted_at = NOW(), deleted_by = $2, updated_at = NOW() \
             WHERE id = $1 AND {NOT_DELETED}",
            self.table_name()
        )
    }

    fn exists_sql(self) -> String {
        format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND {NOT_DELETED})",
            self.table_name()
        )
    }
}

/// Mark a live row as deleted. Returns `false` when the row is unknown or
/// already deleted.
pub async fn soft_delete<'e>(
    executor: impl PgExecutor<'e>,
    table: SoftDeletable,
    id: Uuid,
    actor: Uuid,
) -> SqlxResult<bool> {
    let sql = table.delete_sql();
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(actor)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Whether a live (not soft-deleted) row with this id exists.
pub async fn exists<'e>(
    executor: impl PgExecutor<'e>,
    table: SoftDeletable,
    id: Uuid,
) -> SqlxResult<bool> {
    let sql = table.exists_sql();
    sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(executor)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_only_touches_live_rows() {
        let sql = SoftDeletable::FarmerProfiles.delete_sql();
        assert!(sql.starts_with("UPDATE farmer_profiles SET deleted_at = NOW()"));
        assert!(sql.contains("deleted_by = $2"));
        assert!(sql.ends_with("WHERE id = $1 AND deleted_at IS NULL"));
    }

    #[test]
    fn exists_ignores_deleted_rows() {
        let sql = SoftDeletable::CropCommodities.exists_sql();
        assert_eq!(
            sql,
            "SELECT EXISTS(SELECT 1 FROM crop_commodities WHERE id = $1 AND deleted_at IS NULL)"
        );
    }

    #[test]
    fn table_names_are_distinct() {
        let all = [
            SoftDeletable::UserRoles,
            SoftDeletable::Users,
            SoftDeletable::FarmerProfiles,
            SoftDeletable::FarmProfiles,
            SoftDeletable::CropCategories,
            SoftDeletable::CropCommodities,
            SoftDeletable::LivestockSpecies,
            SoftDeletable::LivestockRecords,
            SoftDeletable::BiosecurityRecords,
            SoftDeletable::RetailPrices,
            SoftDeletable::ProductionRecords,
        ];
        let names: std::collections::HashSet<_> = all.iter().map(|t| t.table_name()).collect();
        assert_eq!(names.len(), all.len());
    }
}
