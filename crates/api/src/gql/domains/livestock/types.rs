use async_graphql::{ComplexObject, Context, Error, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::gql::domains::farm_profiles::types::FarmProfile;
use crate::gql::loaders::load_one;
use infra::models::{FarmProfileRow, LivestockRecordRow, LivestockSpeciesRow};

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LivestockSpecies {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
}

impl From<LivestockSpeciesRow> for LivestockSpecies {
    fn from(row: LivestockSpeciesRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
        }
    }
}

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct LivestockRecord {
    pub id: ID,
    pub farm_profile_id: ID,
    pub species_id: ID,
    pub head_count: i32,
    pub record_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    #[serde(skip)]
    pub farm_uuid: Uuid,
    #[graphql(skip)]
    #[serde(skip)]
    pub species_uuid: Uuid,
}

#[ComplexObject]
impl LivestockRecord {
    async fn farm_profile(&self, ctx: &Context<'_>) -> Result<Option<FarmProfile>> {
        Ok(load_one::<FarmProfileRow>(ctx, self.farm_uuid)
            .await?
            .map(FarmProfile::from))
    }

    async fn species(&self, ctx: &Context<'_>) -> Result<Option<LivestockSpecies>> {
        Ok(load_one::<LivestockSpeciesRow>(ctx, self.species_uuid)
            .await?
            .map(LivestockSpecies::from))
    }
}

impl From<LivestockRecordRow> for LivestockRecord {
    fn from(row: LivestockRecordRow) -> Self {
        Self {
            id: row.id.into(),
            farm_profile_id: row.farm_profile_id.into(),
            species_id: row.species_id.into(),
            head_count: row.head_count,
            record_date: row.record_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            farm_uuid: row.farm_profile_id,
            species_uuid: row.species_id,
        }
    }
}

#[derive(InputObject)]
pub struct CreateLivestockSpeciesInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateLivestockSpeciesInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(InputObject, Default)]
pub struct LivestockRecordFilterInput {
    pub farm_profile_id: Option<ID>,
    pub species_id: Option<ID>,
}

#[derive(InputObject)]
pub struct CreateLivestockRecordInput {
    pub farm_profile_id: ID,
    pub species_id: ID,
    pub head_count: i32,
    pub record_date: NaiveDate,
    pub notes: Option<String>,
}

/// The farm of a record is fixed once created.
#[derive(InputObject)]
pub struct UpdateLivestockRecordInput {
    pub species_id: Option<ID>,
    pub head_count: Option<i32>,
    pub record_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub fn validate_head_count(head_count: Option<i32>) -> Result<()> {
    if head_count.is_some_and(|c| c < 0) {
        return Err(Error::new("Head count cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_count_may_be_zero_but_not_negative() {
        assert!(validate_head_count(Some(0)).is_ok());
        assert!(validate_head_count(None).is_ok());
        assert_eq!(
            validate_head_count(Some(-1)).unwrap_err().message,
            "Head count cannot be negative"
        );
    }
}
