use async_graphql::{ComplexObject, Context, Error, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gql::domains::crop_taxonomy::types::CropCommodity;
use crate::gql::domains::farm_profiles::types::FarmProfile;
use crate::gql::loaders::load_one;
use infra::models::{CropCommodityRow, FarmProfileRow, ProductionRecordRow};
use infra::repos::{CreateProductionRecord, UpdateProductionRecord};

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct ProductionRecord {
    pub id: ID,
    pub farm_profile_id: ID,
    pub commodity_id: ID,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub area_planted_hectares: Option<f64>,
    pub quantity: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    #[serde(skip)]
    pub farm_uuid: Uuid,
    #[graphql(skip)]
    #[serde(skip)]
    pub commodity_uuid: Uuid,
}

#[ComplexObject]
impl ProductionRecord {
    async fn farm_profile(&self, ctx: &Context<'_>) -> Result<Option<FarmProfile>> {
        Ok(load_one::<FarmProfileRow>(ctx, self.farm_uuid)
            .await?
            .map(FarmProfile::from))
    }

    async fn commodity(&self, ctx: &Context<'_>) -> Result<Option<CropCommodity>> {
        Ok(load_one::<CropCommodityRow>(ctx, self.commodity_uuid)
            .await?
            .map(CropCommodity::from))
    }
}

impl From<ProductionRecordRow> for ProductionRecord {
    fn from(row: ProductionRecordRow) -> Self {
        Self {
            id: row.id.into(),
            farm_profile_id: row.farm_profile_id.into(),
            commodity_id: row.commodity_id.into(),
            period_start: row.period_start,
            period_end: row.period_end,
            area_planted_hectares: row.area_planted_hectares,
            quantity: row.quantity,
            unit: row.unit,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            farm_uuid: row.farm_profile_id,
            commodity_uuid: row.commodity_id,
        }
    }
}

#[derive(InputObject, Default)]
pub struct ProductionRecordFilterInput {
    pub farm_profile_id: Option<ID>,
    pub commodity_id: Option<ID>,
    /// Records whose period overlaps this calendar year.
    pub year: Option<i32>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductionRecordPayload {
    pub farm_profile_id: Uuid,
    pub commodity_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub area_planted_hectares: Option<f64>,
    pub quantity: f64,
    pub unit: String,
}

impl From<CreateProductionRecordPayload> for CreateProductionRecord {
    fn from(p: CreateProductionRecordPayload) -> Self {
        Self {
            farm_profile_id: p.farm_profile_id,
            commodity_id: p.commodity_id,
            period_start: p.period_start,
            period_end: p.period_end,
            area_planted_hectares: p.area_planted_hectares,
            quantity: p.quantity,
            unit: p.unit,
        }
    }
}

/// The farm of a production record is fixed once created.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductionRecordPayload {
    pub id: Uuid,
    pub commodity_id: Option<Uuid>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub area_planted_hectares: Option<f64>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl From<UpdateProductionRecordPayload> for UpdateProductionRecord {
    fn from(p: UpdateProductionRecordPayload) -> Self {
        Self {
            commodity_id: p.commodity_id,
            period_start: p.period_start,
            period_end: p.period_end,
            area_planted_hectares: p.area_planted_hectares,
            quantity: p.quantity,
            unit: p.unit,
        }
    }
}

pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(Error::new("Period end must not be before period start"));
    }
    Ok(())
}

pub fn validate_amounts(quantity: Option<f64>, area_planted_hectares: Option<f64>) -> Result<()> {
    if quantity.is_some_and(|q| !(q.is_finite() && q >= 0.0)) {
        return Err(Error::new("Quantity cannot be negative"));
    }
    if area_planted_hectares.is_some_and(|a| !(a.is_finite() && a >= 0.0)) {
        return Err(Error::new("Area planted cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_period_is_valid() {
        assert!(validate_period(date(2026, 3, 1), date(2026, 3, 1)).is_ok());
    }

    #[test]
    fn inverted_period_is_rejected() {
        let err = validate_period(date(2026, 6, 30), date(2026, 1, 1)).unwrap_err();
        assert_eq!(err.message, "Period end must not be before period start");
    }

    #[test]
    fn amounts_must_not_be_negative() {
        assert!(validate_amounts(Some(0.0), None).is_ok());
        assert!(validate_amounts(Some(-3.0), None).is_err());
        assert!(validate_amounts(None, Some(-0.5)).is_err());
    }
}
