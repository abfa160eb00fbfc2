pub mod resolvers;
pub mod types;

pub use resolvers::ActivityLogQuery;

use crate::gql::subscriptions::publish_activity_event;
use sqlx::PgPool;
use types::{ActivityAction, ActivityLogEntry};
use uuid::Uuid;

/// Record an audit entry and push it to `activityLogged` subscribers.
/// Write failures are logged and swallowed.
pub async fn log_and_publish(
    pool: &PgPool,
    actor_id: Option<Uuid>,
    action: ActivityAction,
    entity: &str,
    entity_id: Option<Uuid>,
    metadata: serde_json::Value,
) {
    match infra::repos::activity_log::log_activity(
        pool,
        actor_id,
        action.as_str(),
        entity,
        entity_id,
        metadata,
    )
    .await
    {
        Ok(row) => publish_activity_event(ActivityLogEntry::from(row)),
        Err(e) => {
            tracing::error!(
                entity,
                action = action.as_str(),
                entity_id = ?entity_id,
                "Failed to log activity: {e}"
            );
        }
    }
}
