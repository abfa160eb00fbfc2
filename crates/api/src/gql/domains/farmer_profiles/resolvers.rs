use async_graphql::{Context, Error, Object, Result, ID};

use crate::auth::{require_privilege, require_session, Privilege};
use crate::gql::common::helpers::{
    decode_tokenized, encode_tokenized, log_change, non_blank, non_blank_opt, parse_id,
    soft_delete_and_log,
};
use crate::gql::domains::activity_log::types::ActivityAction;
use crate::gql::error::{DbResultExt, GqlError};
use crate::gql::types::{page_window, PaginatedResponse, PaginationInput};
use crate::state::AppState;
use infra::pagination::LimitOffset;
use infra::repos::{farmer_profiles, FarmerProfileFilter};
use infra::soft_delete::SoftDeletable;
use uuid::Uuid;

use super::types::{
    CreateFarmerProfilePayload, FarmerProfile, FarmerProfileFilterInput,
    UpdateFarmerProfilePayload,
};
use super::ENTITY;

async fn fetch_page(
    state: &AppState,
    filter: Option<FarmerProfileFilterInput>,
    page: LimitOffset,
) -> Result<PaginatedResponse<FarmerProfile>> {
    let filter = filter.unwrap_or_default();
    let filter = FarmerProfileFilter {
        search: filter.search,
        district: filter.district,
    };

    let (rows, total_count) = tokio::try_join!(
        farmer_profiles::list(&state.db, &filter, page),
        farmer_profiles::count(&state.db, &filter)
    )
    .db()?;

    let items = rows.into_iter().map(FarmerProfile::from).collect();
    Ok(PaginatedResponse::new(items, total_count, page))
}

async fn ensure_reference_free(
    state: &AppState,
    reference_no: &str,
    except_id: Option<Uuid>,
) -> Result<()> {
    if farmer_profiles::find_by_reference(&state.db, reference_no, except_id)
        .await
        .db()?
        .is_some()
    {
        return Err(Error::new("Reference number already exists"));
    }
    Ok(())
}

#[derive(Default)]
pub struct FarmerProfileQuery;

#[Object]
impl FarmerProfileQuery {
    async fn farmer_profiles(
        &self,
        ctx: &Context<'_>,
        filter: Option<FarmerProfileFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<FarmerProfile>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        fetch_page(state, filter, page_window(pagination)).await
    }

    /// Same page as `farmerProfiles`, signed as `{ queryResult, iat }`.
    async fn farmer_profiles_tokenized(
        &self,
        ctx: &Context<'_>,
        filter: Option<FarmerProfileFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<String> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let page = fetch_page(state, filter, page_window(pagination)).await?;
        encode_tokenized(state, &page)
    }

    async fn farmer_profile(&self, ctx: &Context<'_>, id: ID) -> Result<Option<FarmerProfile>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "farmer profile")?;

        Ok(farmer_profiles::get_by_id(&state.db, id)
            .await
            .db()?
            .map(FarmerProfile::from))
    }
}

#[derive(Default)]
pub struct FarmerProfileMutation;

#[Object]
impl FarmerProfileMutation {
    async fn create_farmer_profile(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<FarmerProfile> {
        let actor = require_privilege(ctx, Privilege::FarmerProfiles).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: CreateFarmerProfilePayload = decode_tokenized(state, &tokenized)?;
        payload.reference_no = non_blank("Reference number", payload.reference_no)?;
        payload.first_name = non_blank("First name", payload.first_name)?;
        payload.last_name = non_blank("Last name", payload.last_name)?;
        payload.village = non_blank("Village", payload.village)?;
        payload.district = non_blank("District", payload.district)?;

        ensure_reference_free(state, &payload.reference_no, None).await?;

        let row = farmer_profiles::create(&state.db, payload.into(), actor.id)
            .await
            .db_unique("Reference number already exists")?;

        log_change(state, &actor, ActivityAction::Create, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_farmer_profile(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<FarmerProfile> {
        let actor = require_privilege(ctx, Privilege::FarmerProfiles).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: UpdateFarmerProfilePayload = decode_tokenized(state, &tokenized)?;
        payload.reference_no = non_blank_opt("Reference number", payload.reference_no)?;
        payload.first_name = non_blank_opt("First name", payload.first_name)?;
        payload.last_name = non_blank_opt("Last name", payload.last_name)?;
        payload.village = non_blank_opt("Village", payload.village)?;
        payload.district = non_blank_opt("District", payload.district)?;

        let id = payload.id;
        if let Some(reference_no) = &payload.reference_no {
            ensure_reference_free(state, reference_no, Some(id)).await?;
        }

        let row = farmer_profiles::update(&state.db, id, payload.into(), actor.id)
            .await
            .db_unique("Reference number already exists")?
            .ok_or_else(|| GqlError::not_found("Farmer profile"))?;

        log_change(state, &actor, ActivityAction::Update, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_farmer_profile(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::FarmerProfiles).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "farmer profile")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::FarmerProfiles,
            id,
            ENTITY,
            "Farmer profile",
        )
        .await
    }
}
