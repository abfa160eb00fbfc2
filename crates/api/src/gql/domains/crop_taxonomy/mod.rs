pub mod resolvers;
pub mod types;

pub use resolvers::{CropTaxonomyMutation, CropTaxonomyQuery};

pub(crate) const CATEGORY_ENTITY: &str = "crop_category";
pub(crate) const COMMODITY_ENTITY: &str = "crop_commodity";
