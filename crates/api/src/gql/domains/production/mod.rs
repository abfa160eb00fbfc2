pub mod resolvers;
pub mod types;

pub use resolvers::{ProductionMutation, ProductionQuery};

pub(crate) const ENTITY: &str = "production_record";
