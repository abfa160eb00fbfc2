use axum::{extract::State, Json};

use crate::error::AppError;
use crate::state::AppState;
use infra::models::VegetablePriceRow;
use infra::repos::crop_commodities;

/// Public price board: every live vegetable commodity with its most recent
/// retail price, or `null` price fields when none has been recorded.
pub async fn vegetable_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<VegetablePriceRow>>, AppError> {
    let rows = crop_commodities::list_vegetables_with_latest_price(&state.db).await?;
    Ok(Json(rows))
}
