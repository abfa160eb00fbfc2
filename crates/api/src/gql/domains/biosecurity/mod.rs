pub mod resolvers;
pub mod types;

pub use resolvers::{BiosecurityMutation, BiosecurityQuery};

pub(crate) const ENTITY: &str = "biosecurity_record";
