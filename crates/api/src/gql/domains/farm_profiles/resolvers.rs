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
use infra::repos::{farm_profiles, FarmProfileFilter};
use infra::soft_delete::SoftDeletable;

use super::types::{
    validate_geometry, CreateFarmProfilePayload, FarmProfile, FarmProfileFilterInput,
    UpdateFarmProfilePayload,
};
use super::ENTITY;

#[derive(Default)]
pub struct FarmProfileQuery;

#[Object]
impl FarmProfileQuery {
    async fn farm_profiles(
        &self,
        ctx: &Context<'_>,
        filter: Option<FarmProfileFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<FarmProfile>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let filter = filter.unwrap_or_default();
        let filter = FarmProfileFilter {
            farmer_profile_id: filter
                .farmer_profile_id
                .as_ref()
                .map(|id| parse_id(id, "farmer profile"))
                .transpose()?,
            district: filter.district,
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            farm_profiles::list(&state.db, &filter, page),
            farm_profiles::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(FarmProfile::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn farm_profile(&self, ctx: &Context<'_>, id: ID) -> Result<Option<FarmProfile>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "farm profile")?;

        Ok(farm_profiles::get_by_id(&state.db, id)
            .await
            .db()?
            .map(FarmProfile::from))
    }
}

#[derive(Default)]
pub struct FarmProfileMutation;

#[Object]
impl FarmProfileMutation {
    async fn create_farm_profile(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<FarmProfile> {
        let actor = require_privilege(ctx, Privilege::FarmProfiles).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: CreateFarmProfilePayload = decode_tokenized(state, &tokenized)?;
        payload.name = non_blank("Farm name", payload.name)?;
        payload.location = non_blank("Location", payload.location)?;
        payload.district = non_blank("District", payload.district)?;
        validate_geometry(
            Some(payload.area_hectares),
            payload.latitude,
            payload.longitude,
        )?;

        ensure_live(
            state,
            SoftDeletable::FarmerProfiles,
            payload.farmer_profile_id,
            "Farmer profile",
        )
        .await?;

        let row = farm_profiles::create(&state.db, payload.into(), actor.id)
            .await
            .db()?;

        log_change(state, &actor, ActivityAction::Create, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_farm_profile(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<FarmProfile> {
        let actor = require_privilege(ctx, Privilege::FarmProfiles).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: UpdateFarmProfilePayload = decode_tokenized(state, &tokenized)?;
        payload.name = non_blank_opt("Farm name", payload.name)?;
        payload.location = non_blank_opt("Location", payload.location)?;
        payload.district = non_blank_opt("District", payload.district)?;
        validate_geometry(payload.area_hectares, payload.latitude, payload.longitude)?;

        if let Some(farmer_profile_id) = payload.farmer_profile_id {
            ensure_live(
                state,
                SoftDeletable::FarmerProfiles,
                farmer_profile_id,
                "Farmer profile",
            )
            .await?;
        }

        let id = payload.id;
        let row = farm_profiles::update(&state.db, id, payload.into(), actor.id)
            .await
            .db()?
            .ok_or_else(|| GqlError::not_found("Farm profile"))?;

        log_change(state, &actor, ActivityAction::Update, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_farm_profile(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::FarmProfiles).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "farm profile")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::FarmProfiles,
            id,
            ENTITY,
            "Farm profile",
        )
        .await
    }
}
