use async_graphql::MergedObject;

use crate::gql::domains::activity_log::ActivityLogQuery;
use crate::gql::domains::auth::AuthQuery;
use crate::gql::domains::biosecurity::BiosecurityQuery;
use crate::gql::domains::crop_taxonomy::CropTaxonomyQuery;
use crate::gql::domains::farm_profiles::FarmProfileQuery;
use crate::gql::domains::farmer_profiles::FarmerProfileQuery;
use crate::gql::domains::livestock::LivestockQuery;
use crate::gql::domains::production::ProductionQuery;
use crate::gql::domains::retail_prices::RetailPriceQuery;
use crate::gql::domains::users::UserQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    ActivityLogQuery,
    AuthQuery,
    BiosecurityQuery,
    CropTaxonomyQuery,
    FarmProfileQuery,
    FarmerProfileQuery,
    LivestockQuery,
    ProductionQuery,
    RetailPriceQuery,
    UserQuery,
);
