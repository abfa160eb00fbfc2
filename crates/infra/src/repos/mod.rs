pub mod activity_log;
pub mod biosecurity_records;
pub mod crop_categories;
pub mod crop_commodities;
pub mod farm_profiles;
pub mod farmer_profiles;
pub mod livestock_records;
pub mod livestock_species;
pub mod production_records;
pub mod retail_prices;
pub mod user_roles;
pub mod user_sessions;
pub mod users;

pub use activity_log::ActivityLogFilter;
pub use biosecurity_records::{
    BiosecurityRecordFilter, CreateBiosecurityRecord, UpdateBiosecurityRecord,
};
pub use crop_categories::{CreateCropCategory, UpdateCropCategory};
pub use crop_commodities::{CreateCropCommodity, CropCommodityFilter, UpdateCropCommodity};
pub use farm_profiles::{CreateFarmProfile, FarmProfileFilter, UpdateFarmProfile};
pub use farmer_profiles::{CreateFarmerProfile, FarmerProfileFilter, UpdateFarmerProfile};
pub use livestock_records::{CreateLivestockRecord, LivestockRecordFilter, UpdateLivestockRecord};
pub use livestock_species::{CreateLivestockSpecies, UpdateLivestockSpecies};
pub use production_records::{
    CreateProductionRecord, ProductionRecordFilter, UpdateProductionRecord,
};
pub use retail_prices::{CreateRetailPrice, RetailPriceFilter, UpdateRetailPrice};
pub use user_roles::{CreateUserRole, UpdateUserRole, UserRoleFilter};
pub use users::{CreateUserData, UpdateUserData, UserFilter};
