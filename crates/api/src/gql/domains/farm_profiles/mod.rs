pub mod resolvers;
pub mod types;

pub use resolvers::{FarmProfileMutation, FarmProfileQuery};

pub(crate) const ENTITY: &str = "farm_profile";
