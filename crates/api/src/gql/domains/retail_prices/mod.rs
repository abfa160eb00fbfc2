pub mod resolvers;
pub mod types;

pub use resolvers::{RetailPriceMutation, RetailPriceQuery};

pub(crate) const ENTITY: &str = "retail_price";
