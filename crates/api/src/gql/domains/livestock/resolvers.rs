use async_graphql::{Context, Error, Object, Result, ID};
use uuid::Uuid;

use crate::auth::{require_privilege, require_session, Privilege};
use crate::gql::common::helpers::{
    ensure_live, log_change, non_blank, non_blank_opt, parse_id, soft_delete_and_log,
};
use crate::gql::domains::activity_log::types::ActivityAction;
use crate::gql::error::{DbResultExt, GqlError};
use crate::gql::types::{page_window, PaginatedResponse, PaginationInput};
use crate::state::AppState;
use infra::repos::{
    livestock_records, livestock_species, CreateLivestockRecord, CreateLivestockSpecies,
    LivestockRecordFilter, UpdateLivestockRecord, UpdateLivestockSpecies,
};
use infra::soft_delete::SoftDeletable;

use super::types::{
    validate_head_count, CreateLivestockRecordInput, CreateLivestockSpeciesInput,
    LivestockRecord, LivestockRecordFilterInput, LivestockSpecies, UpdateLivestockRecordInput,
    UpdateLivestockSpeciesInput,
};
use super::{RECORD_ENTITY, SPECIES_ENTITY};

async fn ensure_species_name_free(
    state: &AppState,
    name: &str,
    except_id: Option<Uuid>,
) -> Result<()> {
    if livestock_species::find_by_name(&state.db, name, except_id)
        .await
        .db()?
        .is_some()
    {
        return Err(Error::new("Species name already exists"));
    }
    Ok(())
}

#[derive(Default)]
pub struct LivestockQuery;

#[Object]
impl LivestockQuery {
    async fn livestock_species_list(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<LivestockSpecies>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            livestock_species::list(&state.db, page),
            livestock_species::count(&state.db)
        )
        .db()?;

        let items = rows.into_iter().map(LivestockSpecies::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn livestock_species(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> Result<Option<LivestockSpecies>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "livestock species")?;

        Ok(livestock_species::get_by_id(&state.db, id)
            .await
            .db()?
            .map(LivestockSpecies::from))
    }

    async fn livestock_records(
        &self,
        ctx: &Context<'_>,
        filter: Option<LivestockRecordFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<LivestockRecord>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let filter = filter.unwrap_or_default();
        let filter = LivestockRecordFilter {
            farm_profile_id: filter
                .farm_profile_id
                .as_ref()
                .map(|id| parse_id(id, "farm profile"))
                .transpose()?,
            species_id: filter
                .species_id
                .as_ref()
                .map(|id| parse_id(id, "livestock species"))
                .transpose()?,
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            livestock_records::list(&state.db, &filter, page),
            livestock_records::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(LivestockRecord::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn livestock_record(&self, ctx: &Context<'_>, id: ID) -> Result<Option<LivestockRecord>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "livestock record")?;

        Ok(livestock_records::get_by_id(&state.db, id)
            .await
            .db()?
            .map(LivestockRecord::from))
    }
}

#[derive(Default)]
pub struct LivestockMutation;

#[Object]
impl LivestockMutation {
    async fn create_livestock_species(
        &self,
        ctx: &Context<'_>,
        input: CreateLivestockSpeciesInput,
    ) -> Result<LivestockSpecies> {
        let actor = require_privilege(ctx, Privilege::Livestock).await?;
        let state = ctx.data::<AppState>()?;

        let name = non_blank("Species name", input.name)?;
        ensure_species_name_free(state, &name, None).await?;

        let row = livestock_species::create(
            &state.db,
            CreateLivestockSpecies {
                name,
                description: input.description,
            },
            actor.id,
        )
        .await
        .db_unique("Species name already exists")?;

        log_change(state, &actor, ActivityAction::Create, SPECIES_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_livestock_species(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateLivestockSpeciesInput,
    ) -> Result<LivestockSpecies> {
        let actor = require_privilege(ctx, Privilege::Livestock).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "livestock species")?;

        let name = non_blank_opt("Species name", input.name)?;
        if let Some(name) = &name {
            ensure_species_name_free(state, name, Some(id)).await?;
        }

        let row = livestock_species::update(
            &state.db,
            id,
            UpdateLivestockSpecies {
                name,
                description: input.description,
            },
            actor.id,
        )
        .await
        .db_unique("Species name already exists")?
        .ok_or_else(|| GqlError::not_found("Livestock species"))?;

        log_change(state, &actor, ActivityAction::Update, SPECIES_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_livestock_species(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::Livestock).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "livestock species")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::LivestockSpecies,
            id,
            SPECIES_ENTITY,
            "Livestock species",
        )
        .await
    }

    async fn create_livestock_record(
        &self,
        ctx: &Context<'_>,
        input: CreateLivestockRecordInput,
    ) -> Result<LivestockRecord> {
        let actor = require_privilege(ctx, Privilege::Livestock).await?;
        let state = ctx.data::<AppState>()?;

        let farm_profile_id = parse_id(&input.farm_profile_id, "farm profile")?;
        let species_id = parse_id(&input.species_id, "livestock species")?;
        validate_head_count(Some(input.head_count))?;

        ensure_live(state, SoftDeletable::FarmProfiles, farm_profile_id, "Farm profile").await?;
        ensure_live(
            state,
            SoftDeletable::LivestockSpecies,
            species_id,
            "Livestock species",
        )
        .await?;

        let row = livestock_records::create(
            &state.db,
            CreateLivestockRecord {
                farm_profile_id,
                species_id,
                head_count: input.head_count,
                record_date: input.record_date,
                notes: input.notes,
            },
            actor.id,
        )
        .await
        .db()?;

        log_change(state, &actor, ActivityAction::Create, RECORD_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_livestock_record(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateLivestockRecordInput,
    ) -> Result<LivestockRecord> {
        let actor = require_privilege(ctx, Privilege::Livestock).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "livestock record")?;

        validate_head_count(input.head_count)?;
        let species_id = input
            .species_id
            .as_ref()
            .map(|s| parse_id(s, "livestock species"))
            .transpose()?;
        if let Some(species_id) = species_id {
            ensure_live(
                state,
                SoftDeletable::LivestockSpecies,
                species_id,
                "Livestock species",
            )
            .await?;
        }

        let row = livestock_records::update(
            &state.db,
            id,
            UpdateLivestockRecord {
                species_id,
                head_count: input.head_count,
                record_date: input.record_date,
                notes: input.notes,
            },
            actor.id,
        )
        .await
        .db()?
        .ok_or_else(|| GqlError::not_found("Livestock record"))?;

        log_change(state, &actor, ActivityAction::Update, RECORD_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_livestock_record(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::Livestock).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "livestock record")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::LivestockRecords,
            id,
            RECORD_ENTITY,
            "Livestock record",
        )
        .await
    }
}
