use std::{collections::HashMap, future::Future, marker::PhantomData, sync::Arc};

use async_graphql::dataloader::{DataLoader, Loader};
use async_graphql::{Context, Result};
use uuid::Uuid;

use infra::batch::{load_many, BatchRow};
use infra::db::Db;
use infra::models::FarmProfileRow;
use infra::repos::farm_profiles;

use crate::gql::error::GqlError;

/// Batch-loads live rows of one table by id. Soft-deleted rows are left out,
/// so references to them resolve to `None`.
pub struct RowLoader<R> {
    pool: Db,
    _row: PhantomData<fn() -> R>,
}

impl<R> RowLoader<R> {
    pub fn new(pool: Db) -> Self {
        Self {
            pool,
            _row: PhantomData,
        }
    }
}

impl<R: BatchRow> Loader<Uuid> for RowLoader<R> {
    type Value = R;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            let rows: Vec<R> = load_many(&pool, &ids).await.map_err(Arc::new)?;
            Ok(rows.into_iter().map(|r| (r.id(), r)).collect())
        }
    }
}

pub fn row_loader<R: BatchRow>(pool: Db) -> DataLoader<RowLoader<R>> {
    DataLoader::new(RowLoader::new(pool), tokio::spawn)
}

/// Live farms grouped by owning farmer.
pub struct FarmsByFarmerLoader {
    pool: Db,
}

impl Loader<Uuid> for FarmsByFarmerLoader {
    type Value = Vec<FarmProfileRow>;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            let rows = farm_profiles::list_by_farmers(&pool, &ids)
                .await
                .map_err(Arc::new)?;
            Ok(group_by_farmer(rows))
        }
    }
}

fn group_by_farmer(rows: Vec<FarmProfileRow>) -> HashMap<Uuid, Vec<FarmProfileRow>> {
    let mut farms: HashMap<Uuid, Vec<FarmProfileRow>> = HashMap::new();
    for row in rows {
        farms.entry(row.farmer_profile_id).or_default().push(row);
    }
    farms
}

pub fn farms_by_farmer_loader(pool: Db) -> DataLoader<FarmsByFarmerLoader> {
    DataLoader::new(FarmsByFarmerLoader { pool }, tokio::spawn)
}

/// Farms of one farmer; empty when none are live.
pub async fn load_farms(ctx: &Context<'_>, farmer_id: Uuid) -> Result<Vec<FarmProfileRow>> {
    let loader = ctx.data::<DataLoader<FarmsByFarmerLoader>>()?;
    let farms = loader.load_one(farmer_id).await.map_err(|e| {
        tracing::error!(%farmer_id, "Farm batch load failed: {e}");
        GqlError::new("Internal database error")
    })?;
    Ok(farms.unwrap_or_default())
}

/// Resolve a foreign key through the loader registered for `R`.
pub async fn load_one<R: BatchRow>(ctx: &Context<'_>, id: Uuid) -> Result<Option<R>> {
    let loader = ctx.data::<DataLoader<RowLoader<R>>>()?;
    loader.load_one(id).await.map_err(|e| {
        tracing::error!(table = R::TABLE.table_name(), %id, "Batch load failed: {e}");
        GqlError::new("Internal database error").into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn farm(farmer: Uuid, name: &str) -> FarmProfileRow {
        FarmProfileRow {
            id: Uuid::new_v4(),
            farmer_profile_id: farmer,
            name: name.to_string(),
            location: "Vaini".to_string(),
            district: "Tongatapu".to_string(),
            area_hectares: 1.5,
            latitude: None,
            longitude: None,
            tenure_type: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
            updated_by: None,
        }
    }

    #[test]
    fn farms_are_grouped_in_query_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let grouped = group_by_farmer(vec![farm(a, "Alpha"), farm(b, "Beta"), farm(a, "Gamma")]);

        let names: Vec<_> = grouped[&a].iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Gamma"]);
        assert_eq!(grouped[&b].len(), 1);
        assert!(!grouped.contains_key(&Uuid::nil()));
    }
}
