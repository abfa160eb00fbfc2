use async_graphql::{ComplexObject, Context, Error, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gql::domains::farmer_profiles::types::FarmerProfile;
use crate::gql::loaders::load_one;
use infra::models::{FarmProfileRow, FarmerProfileRow};
use infra::repos::{CreateFarmProfile, UpdateFarmProfile};

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct FarmProfile {
    pub id: ID,
    pub farmer_profile_id: ID,
    pub name: String,
    pub location: String,
    pub district: String,
    pub area_hectares: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tenure_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    #[serde(skip)]
    pub farmer_uuid: Uuid,
}

#[ComplexObject]
impl FarmProfile {
    /// `null` once the owning farmer profile has been deleted.
    async fn farmer_profile(&self, ctx: &Context<'_>) -> Result<Option<FarmerProfile>> {
        Ok(load_one::<FarmerProfileRow>(ctx, self.farmer_uuid)
            .await?
            .map(FarmerProfile::from))
    }
}

impl From<FarmProfileRow> for FarmProfile {
    fn from(row: FarmProfileRow) -> Self {
        Self {
            id: row.id.into(),
            farmer_profile_id: row.farmer_profile_id.into(),
            name: row.name,
            location: row.location,
            district: row.district,
            area_hectares: row.area_hectares,
            latitude: row.latitude,
            longitude: row.longitude,
            tenure_type: row.tenure_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            farmer_uuid: row.farmer_profile_id,
        }
    }
}

#[derive(InputObject, Default)]
pub struct FarmProfileFilterInput {
    pub farmer_profile_id: Option<ID>,
    pub district: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmProfilePayload {
    pub farmer_profile_id: Uuid,
    pub name: String,
    pub location: String,
    pub district: String,
    pub area_hectares: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tenure_type: Option<String>,
}

impl From<CreateFarmProfilePayload> for CreateFarmProfile {
    fn from(p: CreateFarmProfilePayload) -> Self {
        Self {
            farmer_profile_id: p.farmer_profile_id,
            name: p.name,
            location: p.location,
            district: p.district,
            area_hectares: p.area_hectares,
            latitude: p.latitude,
            longitude: p.longitude,
            tenure_type: p.tenure_type,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmProfilePayload {
    pub id: Uuid,
    pub farmer_profile_id: Option<Uuid>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub district: Option<String>,
    pub area_hectares: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tenure_type: Option<String>,
}

impl From<UpdateFarmProfilePayload> for UpdateFarmProfile {
    fn from(p: UpdateFarmProfilePayload) -> Self {
        Self {
            farmer_profile_id: p.farmer_profile_id,
            name: p.name,
            location: p.location,
            district: p.district,
            area_hectares: p.area_hectares,
            latitude: p.latitude,
            longitude: p.longitude,
            tenure_type: p.tenure_type,
        }
    }
}

/// Area must be positive; coordinates, when given, must be on the globe.
pub fn validate_geometry(
    area_hectares: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<()> {
    if area_hectares.is_some_and(|a| !(a.is_finite() && a > 0.0)) {
        return Err(Error::new("Area must be greater than zero"));
    }
    if latitude.is_some_and(|l| !(-90.0..=90.0).contains(&l)) {
        return Err(Error::new("Latitude must be between -90 and 90"));
    }
    if longitude.is_some_and(|l| !(-180.0..=180.0).contains(&l)) {
        return Err(Error::new("Longitude must be between -180 and 180"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_bounds() {
        assert!(validate_geometry(Some(1.5), Some(-21.1), Some(-175.2)).is_ok());
        assert!(validate_geometry(None, None, None).is_ok());
        assert_eq!(
            validate_geometry(Some(0.0), None, None).unwrap_err().message,
            "Area must be greater than zero"
        );
        assert!(validate_geometry(None, Some(91.0), None).is_err());
        assert!(validate_geometry(None, None, Some(-181.0)).is_err());
    }
}
