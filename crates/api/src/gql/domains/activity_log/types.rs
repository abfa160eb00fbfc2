use async_graphql::{Enum, InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::models::ActivityLogRow;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Login => "login",
            Self::Logout => "logout",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct ActivityLogEntry {
    pub id: ID,
    pub actor_id: Option<ID>,
    /// Raw action name; `None` for actions this build does not know.
    pub action: Option<ActivityAction>,
    pub entity: String,
    pub entity_id: Option<ID>,
    pub metadata: async_graphql::Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogRow> for ActivityLogEntry {
    fn from(row: ActivityLogRow) -> Self {
        Self {
            id: row.id.into(),
            actor_id: row.actor_id.map(|id| id.into()),
            action: ActivityAction::parse(&row.action),
            entity: row.entity,
            entity_id: row.entity_id.map(|id| id.into()),
            metadata: async_graphql::Json(row.metadata),
            created_at: row.created_at,
        }
    }
}

#[derive(InputObject, Default)]
pub struct ActivityLogFilterInput {
    pub entity: Option<String>,
    pub action: Option<ActivityAction>,
    pub actor_id: Option<ID>,
}
