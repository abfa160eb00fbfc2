use async_graphql::{Context, Object, Result};

use crate::auth::{require_privilege, Privilege};
use crate::gql::common::helpers::parse_id;
use crate::gql::error::DbResultExt;
use crate::gql::types::{page_window, PaginatedResponse, PaginationInput};
use crate::state::AppState;
use infra::repos::{activity_log, ActivityLogFilter};

use super::types::{ActivityLogEntry, ActivityLogFilterInput};

#[derive(Default)]
pub struct ActivityLogQuery;

#[Object]
impl ActivityLogQuery {
    /// Activity log entries, newest first.
    async fn activity_logs(
        &self,
        ctx: &Context<'_>,
        filter: Option<ActivityLogFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<ActivityLogEntry>> {
        require_privilege(ctx, Privilege::ActivityLog).await?;
        let state = ctx.data::<AppState>()?;

        let filter = filter.unwrap_or_default();
        let filter = ActivityLogFilter {
            entity: filter.entity,
            action: filter.action.map(|a| a.as_str().to_string()),
            actor_id: filter
                .actor_id
                .as_ref()
                .map(|id| parse_id(id, "actor"))
                .transpose()?,
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            activity_log::list(&state.db, &filter, page),
            activity_log::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(ActivityLogEntry::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }
}
