use async_graphql::{Context, Enum, Error, Result};
use uuid::Uuid;

use crate::auth::session::claims_match_session;
use crate::auth::Claims;
use crate::state::AppState;
use infra::repos::{user_roles, user_sessions, users};

/// Role privilege granting every other privilege.
pub const WILDCARD_PRIVILEGE: &str = "*";

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum Privilege {
    FarmerProfiles,
    FarmProfiles,
    CropTaxonomy,
    Livestock,
    Biosecurity,
    RetailPrices,
    Production,
    UserManagement,
    ActivityLog,
}

impl Privilege {
    pub const ALL: [Privilege; 9] = [
        Privilege::FarmerProfiles,
        Privilege::FarmProfiles,
        Privilege::CropTaxonomy,
        Privilege::Livestock,
        Privilege::Biosecurity,
        Privilege::RetailPrices,
        Privilege::Production,
        Privilege::UserManagement,
        Privilege::ActivityLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FarmerProfiles => "FARMER_PROFILES",
            Self::FarmProfiles => "FARM_PROFILES",
            Self::CropTaxonomy => "CROP_TAXONOMY",
            Self::Livestock => "LIVESTOCK",
            Self::Biosecurity => "BIOSECURITY",
            Self::RetailPrices => "RETAIL_PRICES",
            Self::Production => "PRODUCTION",
            Self::UserManagement => "USER_MANAGEMENT",
            Self::ActivityLog => "ACTIVITY_LOG",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

/// Check that every entry is a known privilege name or the wildcard.
pub fn validate_privileges(values: &[String]) -> Result<()> {
    match values
        .iter()
        .find(|v| v.as_str() != WILDCARD_PRIVILEGE && Privilege::parse(v).is_none())
    {
        Some(unknown) => Err(Error::new(format!("Unknown privilege: {unknown}"))),
        None => Ok(()),
    }
}

/// The user behind a validated session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub session_id: Uuid,
    pub privileges: Vec<String>,
}

impl SessionUser {
    pub fn has_privilege(&self, privilege: Privilege) -> bool {
        self.privileges
            .iter()
            .any(|p| p == WILDCARD_PRIVILEGE || p == privilege.as_str())
    }
}

/// Resolve the current session: the bearer token must map to an open
/// session belonging to a live, active user.
pub async fn require_session(ctx: &Context<'_>) -> Result<SessionUser> {
    let claims = ctx
        .data::<Claims>()
        .map_err(|_| Error::new("You must be logged in to perform this action"))?;

    let session_id =
        Uuid::parse_str(&claims.sid).map_err(|e| Error::new(format!("Invalid session ID: {e}")))?;
    let user_id =
        Uuid::parse_str(&claims.sub).map_err(|e| Error::new(format!("Invalid user ID: {e}")))?;

    let state = ctx.data::<AppState>()?;

    let session = user_sessions::find_active(&state.db, session_id)
        .await?
        .filter(|s| claims_match_session(claims, s))
        .ok_or_else(|| Error::new("Session expired or revoked"))?;

    let user = users::get_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| Error::new("Session expired or revoked"))?;

    if !user.is_active {
        return Err(Error::new("User account is disabled"));
    }

    // A deleted role leaves the user with no privileges rather than locking the session.
    let privileges = user_roles::get_by_id(&state.db, user.role_id)
        .await?
        .map(|r| r.privileges)
        .unwrap_or_default();

    if let Err(e) = user_sessions::touch(&state.db, session.id).await {
        tracing::warn!(session_id = %session.id, "Failed to update session last_seen_at: {e}");
    }

    Ok(SessionUser {
        id: user.id,
        username: user.username,
        session_id: session.id,
        privileges,
    })
}

/// Require a valid session whose role grants `privilege`.
pub async fn require_privilege(ctx: &Context<'_>, privilege: Privilege) -> Result<SessionUser> {
    let user = require_session(ctx).await?;

    if !user.has_privilege(privilege) {
        return Err(Error::new(format!(
            "Access denied: {} privilege required",
            privilege.as_str()
        )));
    }

    Ok(user)
}
