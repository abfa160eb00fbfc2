use std::env;

use async_graphql::Schema;

use super::loaders::{farms_by_farmer_loader, row_loader};
use super::{MutationRoot, QueryRoot, SubscriptionRoot};
use crate::state::AppState;
use infra::models::{
    CropCategoryRow, CropCommodityRow, FarmProfileRow, FarmerProfileRow, LivestockSpeciesRow,
    UserRoleRow,
};

pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the GraphQL schema and inject shared state (AppState) into the context.
pub fn build_schema(state: AppState) -> AppSchema {
    let introspection_enabled = env::var("GQL_INTROSPECTION")
        .map(|v| v == "true")
        .unwrap_or(false);

    build_schema_with(state, introspection_enabled)
}

pub fn build_schema_with(state: AppState, introspection_enabled: bool) -> AppSchema {
    let db = state.db.clone();

    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot,
    )
    .data(state) // AppState is Clone; available in resolvers via ctx.data::<AppState>()
    .data(row_loader::<UserRoleRow>(db.clone()))
    .data(row_loader::<FarmerProfileRow>(db.clone()))
    .data(row_loader::<FarmProfileRow>(db.clone()))
    .data(row_loader::<CropCategoryRow>(db.clone()))
    .data(row_loader::<CropCommodityRow>(db.clone()))
    .data(row_loader::<LivestockSpeciesRow>(db.clone()))
    .data(farms_by_farmer_loader(db))
    .limit_depth(15)
    .limit_complexity(500);

    if !introspection_enabled {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
