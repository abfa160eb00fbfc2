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
use infra::repos::{biosecurity_records, BiosecurityRecordFilter};
use infra::soft_delete::SoftDeletable;

use super::types::{
    BiosecurityRecord, BiosecurityRecordFilterInput, CreateBiosecurityRecordPayload,
    UpdateBiosecurityRecordPayload,
};
use super::ENTITY;

#[derive(Default)]
pub struct BiosecurityQuery;

#[Object]
impl BiosecurityQuery {
    async fn biosecurity_records(
        &self,
        ctx: &Context<'_>,
        filter: Option<BiosecurityRecordFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<BiosecurityRecord>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let filter = filter.unwrap_or_default();
        let filter = BiosecurityRecordFilter {
            farm_profile_id: filter
                .farm_profile_id
                .as_ref()
                .map(|id| parse_id(id, "farm profile"))
                .transpose()?,
            status: filter.status.map(|s| s.as_str().to_string()),
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            biosecurity_records::list(&state.db, &filter, page),
            biosecurity_records::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(BiosecurityRecord::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn biosecurity_record(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> Result<Option<BiosecurityRecord>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "biosecurity record")?;

        Ok(biosecurity_records::get_by_id(&state.db, id)
            .await
            .db()?
            .map(BiosecurityRecord::from))
    }
}

#[derive(Default)]
pub struct BiosecurityMutation;

#[Object]
impl BiosecurityMutation {
    async fn create_biosecurity_record(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<BiosecurityRecord> {
        let actor = require_privilege(ctx, Privilege::Biosecurity).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: CreateBiosecurityRecordPayload = decode_tokenized(state, &tokenized)?;
        payload.inspector_name = non_blank("Inspector name", payload.inspector_name)?;
        payload.finding = non_blank("Finding", payload.finding)?;

        ensure_live(
            state,
            SoftDeletable::FarmProfiles,
            payload.farm_profile_id,
            "Farm profile",
        )
        .await?;

        let row = biosecurity_records::create(&state.db, payload.into(), actor.id)
            .await
            .db()?;

        log_change(state, &actor, ActivityAction::Create, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_biosecurity_record(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<BiosecurityRecord> {
        let actor = require_privilege(ctx, Privilege::Biosecurity).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: UpdateBiosecurityRecordPayload = decode_tokenized(state, &tokenized)?;
        payload.inspector_name = non_blank_opt("Inspector name", payload.inspector_name)?;
        payload.finding = non_blank_opt("Finding", payload.finding)?;

        let id = payload.id;
        let row = biosecurity_records::update(&state.db, id, payload.into(), actor.id)
            .await
            .db()?
            .ok_or_else(|| GqlError::not_found("Biosecurity record"))?;

        log_change(state, &actor, ActivityAction::Update, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_biosecurity_record(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::Biosecurity).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "biosecurity record")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::BiosecurityRecords,
            id,
            ENTITY,
            "Biosecurity record",
        )
        .await
    }
}
