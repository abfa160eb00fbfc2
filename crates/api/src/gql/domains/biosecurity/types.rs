use std::str::FromStr;

use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gql::domains::farm_profiles::types::FarmProfile;
use crate::gql::loaders::load_one;
use infra::models::{BiosecurityRecordRow, FarmProfileRow};
use infra::repos::{CreateBiosecurityRecord, UpdateBiosecurityRecord};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiosecurityStatus {
    Open,
    UnderTreatment,
    Cleared,
}

impl BiosecurityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::UnderTreatment => "under_treatment",
            Self::Cleared => "cleared",
        }
    }
}

impl FromStr for BiosecurityStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "under_treatment" => Ok(Self::UnderTreatment),
            "cleared" => Ok(Self::Cleared),
            other => Err(other.to_string()),
        }
    }
}

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct BiosecurityRecord {
    pub id: ID,
    pub farm_profile_id: ID,
    pub inspection_date: NaiveDate,
    pub inspector_name: String,
    pub pest_or_disease: Option<String>,
    pub finding: String,
    pub status: BiosecurityStatus,
    pub action_taken: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    #[serde(skip)]
    pub farm_uuid: Uuid,
}

#[ComplexObject]
impl BiosecurityRecord {
    async fn farm_profile(&self, ctx: &Context<'_>) -> Result<Option<FarmProfile>> {
        Ok(load_one::<FarmProfileRow>(ctx, self.farm_uuid)
            .await?
            .map(FarmProfile::from))
    }
}

impl From<BiosecurityRecordRow> for BiosecurityRecord {
    fn from(row: BiosecurityRecordRow) -> Self {
        Self {
            id: row.id.into(),
            farm_profile_id: row.farm_profile_id.into(),
            inspection_date: row.inspection_date,
            inspector_name: row.inspector_name,
            pest_or_disease: row.pest_or_disease,
            finding: row.finding,
            status: row.status.parse().unwrap_or_else(|unknown| {
                tracing::warn!(record = %row.id, "Unknown biosecurity status {unknown:?}");
                BiosecurityStatus::Open
            }),
            action_taken: row.action_taken,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            farm_uuid: row.farm_profile_id,
        }
    }
}

#[derive(InputObject, Default)]
pub struct BiosecurityRecordFilterInput {
    pub farm_profile_id: Option<ID>,
    pub status: Option<BiosecurityStatus>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBiosecurityRecordPayload {
    pub farm_profile_id: Uuid,
    pub inspection_date: NaiveDate,
    pub inspector_name: String,
    pub pest_or_disease: Option<String>,
    pub finding: String,
    /// New inspections start `OPEN` unless stated otherwise.
    pub status: Option<BiosecurityStatus>,
    pub action_taken: Option<String>,
}

impl From<CreateBiosecurityRecordPayload> for CreateBiosecurityRecord {
    fn from(p: CreateBiosecurityRecordPayload) -> Self {
        Self {
            farm_profile_id: p.farm_profile_id,
            inspection_date: p.inspection_date,
            inspector_name: p.inspector_name,
            pest_or_disease: p.pest_or_disease,
            finding: p.finding,
            status: p
                .status
                .unwrap_or(BiosecurityStatus::Open)
                .as_str()
                .to_string(),
            action_taken: p.action_taken,
        }
    }
}

/// The farm of an inspection is fixed once recorded.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBiosecurityRecordPayload {
    pub id: Uuid,
    pub inspection_date: Option<NaiveDate>,
    pub inspector_name: Option<String>,
    pub pest_or_disease: Option<String>,
    pub finding: Option<String>,
    pub status: Option<BiosecurityStatus>,
    pub action_taken: Option<String>,
}

impl From<UpdateBiosecurityRecordPayload> for UpdateBiosecurityRecord {
    fn from(p: UpdateBiosecurityRecordPayload) -> Self {
        Self {
            inspection_date: p.inspection_date,
            inspector_name: p.inspector_name,
            pest_or_disease: p.pest_or_disease,
            finding: p.finding,
            status: p.status.map(|s| s.as_str().to_string()),
            action_taken: p.action_taken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_is_stored_lower_case() {
        for status in [
            BiosecurityStatus::Open,
            BiosecurityStatus::UnderTreatment,
            BiosecurityStatus::Cleared,
        ] {
            assert_eq!(status.as_str().parse::<BiosecurityStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_statuses_do_not_parse() {
        assert_eq!("closed".parse::<BiosecurityStatus>(), Err("closed".to_string()));
        assert!("OPEN".parse::<BiosecurityStatus>().is_err());
    }

    #[test]
    fn payload_status_uses_graphql_names() {
        let payload: UpdateBiosecurityRecordPayload = serde_json::from_value(json!({
            "id": Uuid::nil(),
            "status": "UNDER_TREATMENT"
        }))
        .unwrap();
        assert_eq!(payload.status, Some(BiosecurityStatus::UnderTreatment));

        let data = UpdateBiosecurityRecord::from(payload);
        assert_eq!(data.status.as_deref(), Some("under_treatment"));
    }

    #[test]
    fn create_defaults_to_open() {
        let payload: CreateBiosecurityRecordPayload = serde_json::from_value(json!({
            "farmProfileId": Uuid::nil(),
            "inspectionDate": "2026-02-03",
            "inspectorName": "S. Taufa",
            "finding": "Fruit fly traps positive"
        }))
        .unwrap();

        assert_eq!(CreateBiosecurityRecord::from(payload).status, "open");
    }
}
