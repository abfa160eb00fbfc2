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
    crop_categories, crop_commodities, CreateCropCategory, CreateCropCommodity,
    CropCommodityFilter, UpdateCropCategory, UpdateCropCommodity,
};
use infra::soft_delete::SoftDeletable;

use super::types::{
    normalize_code, CreateCropCategoryInput, CreateCropCommodityInput, CropCategory,
    CropCommodity, CropCommodityFilterInput, UpdateCropCategoryInput, UpdateCropCommodityInput,
};
use super::{CATEGORY_ENTITY, COMMODITY_ENTITY};

fn category_code(code: String) -> Result<String> {
    let code = normalize_code(&code);
    if code.is_empty() {
        return Err(Error::new("Category code is required"));
    }
    Ok(code)
}

async fn ensure_code_free(state: &AppState, code: &str, except_id: Option<Uuid>) -> Result<()> {
    if crop_categories::find_by_code(&state.db, code, except_id)
        .await
        .db()?
        .is_some()
    {
        return Err(Error::new("Category code already exists"));
    }
    Ok(())
}

#[derive(Default)]
pub struct CropTaxonomyQuery;

#[Object]
impl CropTaxonomyQuery {
    async fn crop_categories(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<CropCategory>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            crop_categories::list(&state.db, page),
            crop_categories::count(&state.db)
        )
        .db()?;

        let items = rows.into_iter().map(CropCategory::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn crop_category(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CropCategory>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "crop category")?;

        Ok(crop_categories::get_by_id(&state.db, id)
            .await
            .db()?
            .map(CropCategory::from))
    }

    async fn crop_commodities(
        &self,
        ctx: &Context<'_>,
        filter: Option<CropCommodityFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<CropCommodity>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let filter = filter.unwrap_or_default();
        let filter = CropCommodityFilter {
            category_id: filter
                .category_id
                .as_ref()
                .map(|id| parse_id(id, "crop category"))
                .transpose()?,
            search: filter.search,
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            crop_commodities::list(&state.db, &filter, page),
            crop_commodities::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(CropCommodity::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn crop_commodity(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CropCommodity>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "crop commodity")?;

        Ok(crop_commodities::get_by_id(&state.db, id)
            .await
            .db()?
            .map(CropCommodity::from))
    }
}

#[derive(Default)]
pub struct CropTaxonomyMutation;

#[Object]
impl CropTaxonomyMutation {
    async fn create_crop_category(
        &self,
        ctx: &Context<'_>,
        input: CreateCropCategoryInput,
    ) -> Result<CropCategory> {
        let actor = require_privilege(ctx, Privilege::CropTaxonomy).await?;
        let state = ctx.data::<AppState>()?;

        let code = category_code(input.code)?;
        let name = non_blank("Category name", input.name)?;
        ensure_code_free(state, &code, None).await?;

        let row = crop_categories::create(
            &state.db,
            CreateCropCategory {
                code,
                name,
                description: input.description,
            },
            actor.id,
        )
        .await
        .db_unique("Category code already exists")?;

        log_change(state, &actor, ActivityAction::Create, CATEGORY_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_crop_category(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateCropCategoryInput,
    ) -> Result<CropCategory> {
        let actor = require_privilege(ctx, Privilege::CropTaxonomy).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "crop category")?;

        let code = input.code.map(category_code).transpose()?;
        let name = non_blank_opt("Category name", input.name)?;
        if let Some(code) = &code {
            ensure_code_free(state, code, Some(id)).await?;
        }

        let row = crop_categories::update(
            &state.db,
            id,
            UpdateCropCategory {
                code,
                name,
                description: input.description,
            },
            actor.id,
        )
        .await
        .db_unique("Category code already exists")?
        .ok_or_else(|| GqlError::not_found("Crop category"))?;

        log_change(state, &actor, ActivityAction::Update, CATEGORY_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_crop_category(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::CropTaxonomy).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "crop category")?;

        if crop_categories::count_live_commodities(&state.db, id).await.db()? > 0 {
            return Err(Error::new("Category still has commodities"));
        }

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::CropCategories,
            id,
            CATEGORY_ENTITY,
            "Crop category",
        )
        .await
    }

    async fn create_crop_commodity(
        &self,
        ctx: &Context<'_>,
        input: CreateCropCommodityInput,
    ) -> Result<CropCommodity> {
        let actor = require_privilege(ctx, Privilege::CropTaxonomy).await?;
        let state = ctx.data::<AppState>()?;

        let category_id = parse_id(&input.category_id, "crop category")?;
        let name = non_blank("Commodity name", input.name)?;
        let unit = non_blank("Unit", input.unit)?;
        ensure_live(state, SoftDeletable::CropCategories, category_id, "Crop category").await?;

        let row = crop_commodities::create(
            &state.db,
            CreateCropCommodity {
                category_id,
                name,
                unit,
                scientific_name: input.scientific_name,
            },
            actor.id,
        )
        .await
        .db()?;

        log_change(state, &actor, ActivityAction::Create, COMMODITY_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_crop_commodity(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateCropCommodityInput,
    ) -> Result<CropCommodity> {
        let actor = require_privilege(ctx, Privilege::CropTaxonomy).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "crop commodity")?;

        let category_id = input
            .category_id
            .as_ref()
            .map(|c| parse_id(c, "crop category"))
            .transpose()?;
        if let Some(category_id) = category_id {
            ensure_live(state, SoftDeletable::CropCategories, category_id, "Crop category").await?;
        }

        let row = crop_commodities::update(
            &state.db,
            id,
            UpdateCropCommodity {
                category_id,
                name: non_blank_opt("Commodity name", input.name)?,
                unit: non_blank_opt("Unit", input.unit)?,
                scientific_name: input.scientific_name,
            },
            actor.id,
        )
        .await
        .db()?
        .ok_or_else(|| GqlError::not_found("Crop commodity"))?;

        log_change(state, &actor, ActivityAction::Update, COMMODITY_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_crop_commodity(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::CropTaxonomy).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "crop commodity")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::CropCommodities,
            id,
            COMMODITY_ENTITY,
            "Crop commodity",
        )
        .await
    }
}
