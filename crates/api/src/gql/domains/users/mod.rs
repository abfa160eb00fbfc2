pub mod resolvers;
pub mod types;

pub use resolvers::{UserMutation, UserQuery};

pub(crate) const USER_ENTITY: &str = "user";
pub(crate) const ROLE_ENTITY: &str = "user_role";
