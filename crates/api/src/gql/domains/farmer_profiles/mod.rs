pub mod resolvers;
pub mod types;

pub use resolvers::{FarmerProfileMutation, FarmerProfileQuery};

pub(crate) const ENTITY: &str = "farmer_profile";
