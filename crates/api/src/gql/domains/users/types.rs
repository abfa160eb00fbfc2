use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::loaders::load_one;
use infra::models::{UserRoleRow, UserRow};

#[derive(SimpleObject, Clone, Debug)]
pub struct UserRole {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    /// Privilege names, or `*` for every privilege.
    pub privileges: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
}

impl From<UserRoleRow> for UserRole {
    fn from(row: UserRoleRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            privileges: row.privileges,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct User {
    pub id: ID,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role_id: ID,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<ID>,
    pub updated_by: Option<ID>,
    #[graphql(skip)]
    pub role_uuid: Uuid,
}

#[ComplexObject]
impl User {
    async fn role(&self, ctx: &Context<'_>) -> Result<Option<UserRole>> {
        Ok(load_one::<UserRoleRow>(ctx, self.role_uuid)
            .await?
            .map(UserRole::from))
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            username: row.username,
            full_name: row.full_name,
            email: row.email,
            role_id: row.role_id.into(),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by.map(Into::into),
            updated_by: row.updated_by.map(Into::into),
            role_uuid: row.role_id,
        }
    }
}

#[derive(InputObject, Default)]
pub struct UserRoleFilterInput {
    pub search: Option<String>,
}

#[derive(InputObject)]
pub struct CreateUserRoleInput {
    pub name: String,
    pub description: Option<String>,
    pub privileges: Vec<String>,
}

#[derive(InputObject)]
pub struct UpdateUserRoleInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privileges: Option<Vec<String>>,
}

#[derive(InputObject, Default)]
pub struct UserFilterInput {
    /// Matches username or full name.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub role_id: Option<ID>,
}

#[derive(InputObject)]
pub struct CreateUserInput {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub password: String,
    pub role_id: ID,
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<ID>,
    pub is_active: Option<bool>,
}
