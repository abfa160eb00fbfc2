pub mod resolvers;
pub mod types;

pub use resolvers::{LivestockMutation, LivestockQuery};

pub(crate) const SPECIES_ENTITY: &str = "livestock_species";
pub(crate) const RECORD_ENTITY: &str = "livestock_record";
