use async_graphql::{ComplexObject, Context, Error, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gql::domains::crop_taxonomy::types::CropCommodity;
use crate::gql::loaders::load_one;
use infra::models::{CropCommodityRow, RetailPriceRow};
use infra::repos::{CreateRetailPrice, UpdateRetailPrice};

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct RetailPrice {
    pub id: ID,
    pub commodity_id: ID,
    pub market: String,
    pub price: f64,
    pub unit: String,
    pub price_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    #[serde(skip)]
    pub commodity_uuid: Uuid,
}

#[ComplexObject]
impl RetailPrice {
    async fn commodity(&self, ctx: &Context<'_>) -> Result<Option<CropCommodity>> {
        Ok(load_one::<CropCommodityRow>(ctx, self.commodity_uuid)
            .await?
            .map(CropCommodity::from))
    }
}

impl From<RetailPriceRow> for RetailPrice {
    fn from(row: RetailPriceRow) -> Self {
        Self {
            id: row.id.into(),
            commodity_id: row.commodity_id.into(),
            market: row.market,
            price: row.price,
            unit: row.unit,
            price_date: row.price_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            commodity_uuid: row.commodity_id,
        }
    }
}

#[derive(InputObject, Default)]
pub struct RetailPriceFilterInput {
    pub commodity_id: Option<ID>,
    /// Case-insensitive market name.
    pub market: Option<String>,
    /// Inclusive lower bound on `priceDate`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `priceDate`.
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateRetailPricePayload {
    pub commodity_id: Uuid,
    pub market: String,
    pub price: f64,
    pub unit: String,
    pub price_date: NaiveDate,
}

impl From<CreateRetailPricePayload> for CreateRetailPrice {
    fn from(p: CreateRetailPricePayload) -> Self {
        Self {
            commodity_id: p.commodity_id,
            market: p.market,
            price: p.price,
            unit: p.unit,
            price_date: p.price_date,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRetailPricePayload {
    pub id: Uuid,
    pub commodity_id: Option<Uuid>,
    pub market: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub price_date: Option<NaiveDate>,
}

impl From<UpdateRetailPricePayload> for UpdateRetailPrice {
    fn from(p: UpdateRetailPricePayload) -> Self {
        Self {
            commodity_id: p.commodity_id,
            market: p.market,
            price: p.price,
            unit: p.unit,
            price_date: p.price_date,
        }
    }
}

pub fn validate_price(price: Option<f64>) -> Result<()> {
    if price.is_some_and(|p| !(p.is_finite() && p > 0.0)) {
        return Err(Error::new("Price must be greater than zero"));
    }
    Ok(())
}

pub fn validate_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(Error::new("`from` must not be after `to`")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_must_be_positive() {
        assert!(validate_price(Some(2.5)).is_ok());
        assert!(validate_price(None).is_ok());
        assert!(validate_price(Some(0.0)).is_err());
        assert!(validate_price(Some(-1.0)).is_err());
        assert!(validate_price(Some(f64::NAN)).is_err());
    }

    #[test]
    fn date_range_must_be_ordered() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1);
        let feb = NaiveDate::from_ymd_opt(2026, 2, 1);
        assert!(validate_date_range(jan, feb).is_ok());
        assert!(validate_date_range(jan, None).is_ok());
        assert!(validate_date_range(feb, jan).is_err());
    }
}
