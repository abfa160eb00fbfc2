use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gql::domains::farm_profiles::types::FarmProfile;
use crate::gql::loaders::load_farms;
use infra::models::FarmerProfileRow;
use infra::repos::{CreateFarmerProfile, UpdateFarmerProfile};

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct FarmerProfile {
    pub id: ID,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    #[serde(skip)]
    pub uuid: Uuid,
}

#[ComplexObject]
impl FarmerProfile {
    /// Live farms registered to this farmer.
    async fn farms(&self, ctx: &Context<'_>) -> Result<Vec<FarmProfile>> {
        let rows = load_farms(ctx, self.uuid).await?;
        Ok(rows.into_iter().map(FarmProfile::from).collect())
    }
}

impl From<FarmerProfileRow> for FarmerProfile {
    fn from(row: FarmerProfileRow) -> Self {
        Self {
            id: row.id.into(),
            reference_no: row.reference_no,
            first_name: row.first_name,
            last_name: row.last_name,
            gender: row.gender,
            date_of_birth: row.date_of_birth,
            phone: row.phone,
            email: row.email,
            village: row.village,
            district: row.district,
            island: row.island,
            national_id: row.national_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            uuid: row.id,
        }
    }
}

#[derive(InputObject, Default)]
pub struct FarmerProfileFilterInput {
    /// Matches first name, last name or reference number.
    pub search: Option<String>,
    pub district: Option<String>,
}

/// Claims of the `tokenized` argument to `createFarmerProfile`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmerProfilePayload {
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

impl From<CreateFarmerProfilePayload> for CreateFarmerProfile {
    fn from(p: CreateFarmerProfilePayload) -> Self {
        Self {
            reference_no: p.reference_no,
            first_name: p.first_name,
            last_name: p.last_name,
            gender: p.gender,
            date_of_birth: p.date_of_birth,
            phone: p.phone,
            email: p.email,
            village: p.village,
            district: p.district,
            island: p.island,
            national_id: p.national_id,
        }
    }
}

/// Claims of the `tokenized` argument to `updateFarmerProfile`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmerProfilePayload {
    pub id: Uuid,
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

impl From<UpdateFarmerProfilePayload> for UpdateFarmerProfile {
    fn from(p: UpdateFarmerProfilePayload) -> Self {
        Self {
            reference_no: p.reference_no,
            first_name: p.first_name,
            last_name: p.last_name,
            gender: p.gender,
            date_of_birth: p.date_of_birth,
            phone: p.phone,
            email: p.email,
            village: p.village,
            district: p.district,
            island: p.island,
            national_id: p.national_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_reads_camel_case_claims() {
        let payload: CreateFarmerProfilePayload = serde_json::from_value(json!({
            "referenceNo": "TO-0042",
            "firstName": "Mele",
            "lastName": "Fifita",
            "dateOfBirth": "1980-04-12",
            "village": "Kolonga",
            "district": "Hahake",
            "iat": 1_700_000_000
        }))
        .unwrap();

        assert_eq!(payload.reference_no, "TO-0042");
        assert_eq!(payload.date_of_birth, NaiveDate::from_ymd_opt(1980, 4, 12));
        assert!(payload.island.is_none());
    }

    #[test]
    fn update_payload_requires_id() {
        let missing = serde_json::from_value::<UpdateFarmerProfilePayload>(json!({
            "firstName": "Mele"
        }));
        assert!(missing.unwrap_err().to_string().contains("id"));
    }

    #[test]
    fn serialized_profile_uses_camel_case_and_hides_internal_id() {
        let id = Uuid::new_v4();
        let row = FarmerProfileRow {
            id,
            reference_no: "TO-0042".into(),
            first_name: "Mele".into(),
            last_name: "Fifita".into(),
            gender: None,
            date_of_birth: None,
            phone: None,
            email: None,
            village: "Kolonga".into(),
            district: "Hahake".into(),
            island: Some("Tongatapu".into()),
            national_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
            updated_by: None,
        };

        let value = serde_json::to_value(FarmerProfile::from(row)).unwrap();
        assert_eq!(value["id"], json!(id.to_string()));
        assert_eq!(value["referenceNo"], json!("TO-0042"));
        assert!(value.get("uuid").is_none());
    }
}
