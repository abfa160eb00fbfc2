use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::gql::loaders::load_one;
use infra::models::{CropCategoryRow, CropCommodityRow};

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CropCategory {
    pub id: ID,
    /// Stable upper-case code, e.g. `VEGETABLES`.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
}

impl From<CropCategoryRow> for CropCategory {
    fn from(row: CropCategoryRow) -> Self {
        Self {
            id: row.id.into(),
            code: row.code,
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
pub struct CropCommodity {
    pub id: ID,
    pub category_id: ID,
    pub name: String,
    pub unit: String,
    pub scientific_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    #[serde(skip)]
    pub category_uuid: Uuid,
}

#[ComplexObject]
impl CropCommodity {
    async fn category(&self, ctx: &Context<'_>) -> Result<Option<CropCategory>> {
        Ok(load_one::<CropCategoryRow>(ctx, self.category_uuid)
            .await?
            .map(CropCategory::from))
    }
}

impl From<CropCommodityRow> for CropCommodity {
    fn from(row: CropCommodityRow) -> Self {
        Self {
            id: row.id.into(),
            category_id: row.category_id.into(),
            name: row.name,
            unit: row.unit,
            scientific_name: row.scientific_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            category_uuid: row.category_id,
        }
    }
}

#[derive(InputObject)]
pub struct CreateCropCategoryInput {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateCropCategoryInput {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(InputObject, Default)]
pub struct CropCommodityFilterInput {
    pub category_id: Option<ID>,
    pub search: Option<String>,
}

#[derive(InputObject)]
pub struct CreateCropCommodityInput {
    pub category_id: ID,
    pub name: String,
    pub unit: String,
    pub scientific_name: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateCropCommodityInput {
    pub category_id: Option<ID>,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub scientific_name: Option<String>,
}

/// Category codes are stored upper-case with inner spaces turned into `_`.
pub fn normalize_code(code: &str) -> String {
    code.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}
