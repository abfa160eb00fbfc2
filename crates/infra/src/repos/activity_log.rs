use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::{models::ActivityLogRow, pagination::LimitOffset};

const COLUMNS: &str = "id, actor_id, action, entity, entity_id, metadata, created_at";

#[derive(Debug, Clone, Default)]
pub struct ActivityLogFilter {
    pub entity: Option<String>,
    pub action: Option<String>,
    pub actor_id: Option<Uuid>,
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ActivityLogFilter) {
    if let Some(entity) = &filter.entity {
        query.push(" AND entity = ");
        query.push_bind(entity.clone());
    }
    if let Some(action) = &filter.action {
        query.push(" AND action = ");
        query.push_bind(action.clone());
    }
    if let Some(actor_id) = filter.actor_id {
        query.push(" AND actor_id = ");
        query.push_bind(actor_id);
    }
}

/// Insert a new activity log entry and return it.
pub async fn log_activity<'e>(
    executor: impl PgExecutor<'e>,
    actor_id: Option<Uuid>,
    action: &str,
    entity: &str,
    entity_id: Option<Uuid>,
    metadata: serde_json::Value,
) -> SqlxResult<ActivityLogRow> {
    let sql = format!(
        "INSERT INTO activity_logs (actor_id, action, entity, entity_id, metadata)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ActivityLogRow>(&sql)
        .bind(actor_id)
        .bind(action)
        .bind(entity)
        .bind(entity_id)
        .bind(metadata)
        .fetch_one(executor)
        .await
}

/// List activity log entries, newest first.
pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ActivityLogFilter,
    page: LimitOffset,
) -> SqlxResult<Vec<ActivityLogRow>> {
    let mut query = QueryBuilder::new(format!("SELECT {COLUMNS} FROM activity_logs WHERE 1=1"));
    push_filters(&mut query, filter);
    query.push(" ORDER BY created_at DESC LIMIT ");
    query.push_bind(page.limit);
    query.push(" OFFSET ");
    query.push_bind(page.offset);

    query.build_query_as::<ActivityLogRow>().fetch_all(executor).await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ActivityLogFilter,
) -> SqlxResult<i64> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM activity_logs WHERE 1=1");
    push_filters(&mut query, filter);

    query.build_query_scalar::<i64>().fetch_one(executor).await
}
