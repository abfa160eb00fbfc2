use async_graphql::MergedObject;

use crate::gql::domains::auth::AuthMutation;
use crate::gql::domains::biosecurity::BiosecurityMutation;
use crate::gql::domains::crop_taxonomy::CropTaxonomyMutation;
use crate::gql::domains::farm_profiles::FarmProfileMutation;
use crate::gql::domains::farmer_profiles::FarmerProfileMutation;
use crate::gql::domains::livestock::LivestockMutation;
use crate::gql::domains::production::ProductionMutation;
use crate::gql::domains::retail_prices::RetailPriceMutation;
use crate::gql::domains::users::UserMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AuthMutation,
    BiosecurityMutation,
    CropTaxonomyMutation,
    FarmProfileMutation,
    FarmerProfileMutation,
    LivestockMutation,
    ProductionMutation,
    RetailPriceMutation,
    UserMutation,
);
