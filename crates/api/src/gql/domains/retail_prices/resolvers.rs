use async_graphql::{Context, Object, Result, ID};

use crate::auth::{require_privilege, require_session, Privilege};
use crate::gql::common::helpers::{
    decode_tokenized, encode_tokenized, ensure_live, log_change, non_blank, non_blank_opt,
    parse_id, soft_delete_and_log,
};
use crate::gql::domains::activity_log::types::ActivityAction;
use crate::gql::error::{DbResultExt, GqlError};
use crate::gql::types::{page_window, PaginatedResponse, PaginationInput};
use crate::state::AppState;
use infra::pagination::LimitOffset;
use infra::repos::{retail_prices, RetailPriceFilter};
use infra::soft_delete::SoftDeletable;

use super::types::{
    validate_date_range, validate_price, CreateRetailPricePayload, RetailPrice,
    RetailPriceFilterInput, UpdateRetailPricePayload,
};
use super::ENTITY;

async fn fetch_page(
    state: &AppState,
    filter: Option<RetailPriceFilterInput>,
    page: LimitOffset,
) -> Result<PaginatedResponse<RetailPrice>> {
    let filter = filter.unwrap_or_default();
    validate_date_range(filter.from, filter.to)?;

    let filter = RetailPriceFilter {
        commodity_id: filter
            .commodity_id
            .as_ref()
            .map(|id| parse_id(id, "commodity"))
            .transpose()?,
        market: filter.market,
        from: filter.from,
        to: filter.to,
    };

    let (rows, total_count) = tokio::try_join!(
        retail_prices::list(&state.db, &filter, page),
        retail_prices::count(&state.db, &filter)
    )
    .db()?;

    let items = rows.into_iter().map(RetailPrice::from).collect();
    Ok(PaginatedResponse::new(items, total_count, page))
}

#[derive(Default)]
pub struct RetailPriceQuery;

#[Object]
impl RetailPriceQuery {
    /// Retail prices, newest price date first.
    async fn retail_prices(
        &self,
        ctx: &Context<'_>,
        filter: Option<RetailPriceFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<RetailPrice>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        fetch_page(state, filter, page_window(pagination)).await
    }

    /// Same page as `retailPrices`, signed as `{ queryResult, iat }`.
    async fn retail_prices_tokenized(
        &self,
        ctx: &Context<'_>,
        filter: Option<RetailPriceFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<String> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let page = fetch_page(state, filter, page_window(pagination)).await?;
        encode_tokenized(state, &page)
    }

    async fn retail_price(&self, ctx: &Context<'_>, id: ID) -> Result<Option<RetailPrice>> {
        require_session(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "retail price")?;

        Ok(retail_prices::get_by_id(&state.db, id)
            .await
            .db()?
            .map(RetailPrice::from))
    }
}

#[derive(Default)]
pub struct RetailPriceMutation;

#[Object]
impl RetailPriceMutation {
    async fn create_retail_price(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<RetailPrice> {
        let actor = require_privilege(ctx, Privilege::RetailPrices).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: CreateRetailPricePayload = decode_tokenized(state, &tokenized)?;
        payload.market = non_blank("Market", payload.market)?;
        payload.unit = non_blank("Unit", payload.unit)?;
        validate_price(Some(payload.price))?;

        ensure_live(
            state,
            SoftDeletable::CropCommodities,
            payload.commodity_id,
            "Crop commodity",
        )
        .await?;

        let row = retail_prices::create(&state.db, payload.into(), actor.id)
            .await
            .db()?;

        log_change(state, &actor, ActivityAction::Create, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_retail_price(
        &self,
        ctx: &Context<'_>,
        tokenized: String,
    ) -> Result<RetailPrice> {
        let actor = require_privilege(ctx, Privilege::RetailPrices).await?;
        let state = ctx.data::<AppState>()?;

        let mut payload: UpdateRetailPricePayload = decode_tokenized(state, &tokenized)?;
        payload.market = non_blank_opt("Market", payload.market)?;
        payload.unit = non_blank_opt("Unit", payload.unit)?;
        validate_price(payload.price)?;

        if let Some(commodity_id) = payload.commodity_id {
            ensure_live(
                state,
                SoftDeletable::CropCommodities,
                commodity_id,
                "Crop commodity",
            )
            .await?;
        }

        let id = payload.id;
        let row = retail_prices::update(&state.db, id, payload.into(), actor.id)
            .await
            .db()?
            .ok_or_else(|| GqlError::not_found("Retail price"))?;

        log_change(state, &actor, ActivityAction::Update, ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_retail_price(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::RetailPrices).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "retail price")?;

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::RetailPrices,
            id,
            ENTITY,
            "Retail price",
        )
        .await
    }
}
