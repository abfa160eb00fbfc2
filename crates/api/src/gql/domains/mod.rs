pub mod activity_log;
pub mod auth;
pub mod biosecurity;
pub mod crop_taxonomy;
pub mod farm_profiles;
pub mod farmer_profiles;
pub mod livestock;
pub mod production;
pub mod retail_prices;
pub mod users;
