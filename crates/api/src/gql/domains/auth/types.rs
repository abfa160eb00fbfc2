use async_graphql::SimpleObject;

use crate::gql::domains::users::types::User;

#[derive(SimpleObject, Clone)]
pub struct AuthPayload {
    /// Bearer token for the new session.
    pub token: String,
    pub user: User,
}
