use async_graphql::{Context, Object, Result, ID};

use crate::auth::{require_privilege, require_session, Privilege};
use crate::gql::common::helpers::{
    decode_tokenized, ensure_live, log_change, non_blank, non_blank_opt, parse_id,
    soft_delete_and_log,
};
use crate::gql::domains::activity_log::types::ActivityAction;
use crate::gql::error::{DbResultExt, GqlError};
use crate::gql::types::{page_window, PaginatedResponse, PaginationInput};
use crate::state::AppState;
use infra::repos::{production_records, ProductionRecordFilter};
use infra::soft_delete::SoftDeletable;

use super::types::{
    validate_amounts, validate_period, CreateProductionRecordPayload, ProductionRecord,
    ProductionRecordFilterInput, UpdateProductionRecordPayload,
};
use super::ENTITY;

#[derive(Default)]
pub struct ProductionQuery;

#[Object]
impl ProductionQuery {
    async fn production_records(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductionRecordFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<ProductionRecord>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let filter = filter.unwrap_or_default();
        let filter = ProductionRecordFilter {
            farm_profile_id: filter
                .farm_profile_id
                .as_ref()
                .map(|id| parse_id(id, "farm profile"))
                .transpose()?,
            commodity_id: filter
                .commodity_id
                .as_ref()
                .map(|id| parse_id(id, "commodity"))
                .transpose()?,
            year: filter.year,
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            production_records::list(&state.db, &filter, page),
            production_records::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(ProductionRecord::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn production_record(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> Result<Option<ProductionRecord>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "production record")?;

        Ok(production_records::get_by_id(&state.db, id)
            .await
            .db()?
            .map(ProductionRecord::from))
    }
}

#[derive(Default)]
pub struct ProductionMutation;

#[Object]
impl ProductionMutation {
    async fn create_production_record(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<ProductionRecord> {
        let actor = require_privilege(ctx, Privilege::Production).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: CreateProductionRecordPayload = decode_tokenized(state, &tokenized)?;
        payload.unit = non_blank("Unit", payload.unit)?;
        validate_period(payload.period_start, payload.period_end)?;
        validate_amounts(Some(payload.quantity), payload.area_planted_hectares)?;

        ensure_live(
            state,
            SoftDeletable::FarmProfiles,
            payload.farm_profile_id,
            "Farm profile",
        )
        .await?;
        ensure_live(
            state,
            SoftDeletable::CropCommodities,
            payload.commodity_id,
            "Crop commodity",
        )
        .await?;

        let row = production_records::create(&state.db, payload.into(), actor.id)
            .await
            .db()?;

        log_change(state, &actor, ActivityAction::Create, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_production_record(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<ProductionRecord> {
        let actor = require_privilege(ctx, Privilege::Production).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: UpdateProductionRecordPayload = decode_tokenized(state, &tokenized)?;
        payload.unit = non_blank_opt("Unit", payload.unit)?;
        validate_amounts(payload.quantity, payload.area_planted_hectares)?;

        let id = payload.id;
        let existing = production_records::get_by_id(&state.db, id)
            .await
            .db()?
            .ok_or_else(|| GqlError::not_found("Production record"))?;

        // A partial update may move either end; check the merged period.
        validate_period(
            payload.period_start.unwrap_or(existing.period_start),
            payload.period_end.unwrap_or(existing.period_end),
        )?;

        if let Some(commodity_id) = payload.commodity_id {
            ensure_live(
                state,
                SoftDeletable::CropCommodities,
                commodity_id,
                "Crop commodity",
            )
            .await?;
        }

        let row = production_records::update(&state.db, id, payload.into(), actor.id)
            .await
            .db()?
            .ok_or_else(|| GqlError::not_found("Production record"))?;

        log_change(state, &actor, ActivityAction::Update, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_production_record(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::Production).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "production record")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::ProductionRecords,
            id,
            ENTITY,
            "Production record",
        )
        .await
    }
}
