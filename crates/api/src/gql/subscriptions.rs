use async_graphql::{Context, Result, Subscription};
use futures_util::{Stream, StreamExt};
use once_cell::sync::Lazy;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::auth::{require_privilege, Privilege};
use crate::gql::domains::activity_log::types::ActivityLogEntry;

/// Process-wide feed of new activity log entries.
static ACTIVITY: Lazy<broadcast::Sender<ActivityLogEntry>> =
    Lazy::new(|| broadcast::channel(256).0);

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Live feed of activity log entries, optionally limited to one entity
    /// (for example `farmer_profile`).
    async fn activity_logged(
        &self,
        ctx: &Context<'_>,
        entity: Option<String>,
    ) -> Result<impl Stream<Item = ActivityLogEntry>> {
        require_privilege(ctx, Privilege::ActivityLog).await?;

        let receiver = ACTIVITY.subscribe();

        Ok(BroadcastStream::new(receiver).filter_map(move |event| {
            let entry = match event {
                Ok(entry) => entry,
                Err(e) => {
                    // Lagged receivers skip ahead rather than closing the stream
                    tracing::warn!("Activity subscriber dropped events: {e}");
                    return futures_util::future::ready(None);
                }
            };
            let wanted = entity.as_deref().is_none_or(|e| e == entry.entity);
            futures_util::future::ready(wanted.then_some(entry))
        }))
    }
}

/// Publish an activity log entry to live subscribers. Having no subscribers
/// is not an error.
pub fn publish_activity_event(entry: ActivityLogEntry) {
    let _ = ACTIVITY.send(entry);
}
