use async_graphql::{Context, Error, Object, Result, ID};

use crate::auth::password::PasswordService;
use crate::auth::permissions::{validate_privileges, WILDCARD_PRIVILEGE};
use crate::auth::{require_privilege, Privilege};
use crate::gql::common::helpers::{
    ensure_live, log_change, non_blank, non_blank_opt, parse_id, soft_delete_and_log,
};
use crate::gql::domains::activity_log::types::ActivityAction;
use crate::gql::error::{DbResultExt, GqlError};
use crate::gql::types::{page_window, PaginatedResponse, PaginationInput};
use crate::state::AppState;
use infra::repos::{
    user_roles, user_sessions, users, CreateUserData, CreateUserRole, UpdateUserData,
    UpdateUserRole, UserFilter, UserRoleFilter,
};
use infra::soft_delete::SoftDeletable;

use super::types::{
    CreateUserInput, CreateUserRoleInput, UpdateUserInput, UpdateUserRoleInput, User,
    UserFilterInput, UserRole, UserRoleFilterInput,
};
use super::{ROLE_ENTITY, USER_ENTITY};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn user_roles(
        &self,
        ctx: &Context<'_>,
        filter: Option<UserRoleFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<UserRole>> {
        require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;

        let filter = UserRoleFilter {
            search: filter.unwrap_or_default().search,
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            user_roles::list(&state.db, &filter, page),
            user_roles::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(UserRole::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn user_role(&self, ctx: &Context<'_>, id: ID) -> Result<Option<UserRole>> {
        require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "role")?;

        Ok(user_roles::get_by_id(&state.db, id)
            .await
            .db()?
            .map(UserRole::from))
    }

    /// Privilege names a role may be granted, including the wildcard.
    async fn available_privileges(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        require_privilege(ctx, Privilege::UserManagement).await?;

        Ok(std::iter::once(WILDCARD_PRIVILEGE)
            .chain(Privilege::ALL.iter().map(|p| p.as_str()))
            .map(str::to_string)
            .collect())
    }

    async fn users(
        &self,
        ctx: &Context<'_>,
        filter: Option<UserFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<User>> {
        require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;

        let filter = filter.unwrap_or_default();
        let filter = UserFilter {
            search: filter.search,
            is_active: filter.is_active,
            role_id: filter
                .role_id
                .as_ref()
                .map(|id| parse_id(id, "role"))
                .transpose()?,
        };
        let page = page_window(pagination);

        let (rows, total_count) = tokio::try_join!(
            users::list(&state.db, &filter, page),
            users::count(&state.db, &filter)
        )
        .db()?;

        let items = rows.into_iter().map(User::from).collect();
        Ok(PaginatedResponse::new(items, total_count, page))
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<User>> {
        require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "user")?;

        Ok(users::get_by_id(&state.db, id).await.db()?.map(User::from))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user_role(
        &self,
        ctx: &Context<'_>,
        input: CreateUserRoleInput,
    ) -> Result<UserRole> {
        let actor = require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;

        let name = non_blank("Role name", input.name)?;
        validate_privileges(&input.privileges)?;

        if user_roles::get_by_name(&state.db, &name).await.db()?.is_some() {
            return Err(Error::new("Role name already exists"));
        }

        let row = user_roles::create(
            &state.db,
            CreateUserRole {
                name,
                description: input.description,
                privileges: input.privileges,
            },
            actor.id,
        )
        .await
        .db_unique("Role name already exists")?;

        log_change(state, &actor, ActivityAction::Create, ROLE_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_user_role(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateUserRoleInput,
    ) -> Result<UserRole> {
        let actor = require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "role")?;

        let name = non_blank_opt("Role name", input.name)?;
        if let Some(privileges) = &input.privileges {
            validate_privileges(privileges)?;
        }

        if let Some(name) = &name {
            let taken = user_roles::get_by_name(&state.db, name).await.db()?;
            if taken.is_some_and(|r| r.id != id) {
                return Err(Error::new("Role name already exists"));
            }
        }

        let row = user_roles::update(
            &state.db,
            id,
            UpdateUserRole {
                name,
                description: input.description,
                privileges: input.privileges,
            },
            actor.id,
        )
        .await
        .db_unique("Role name already exists")?
        .ok_or_else(|| GqlError::not_found("Role"))?;

        log_change(state, &actor, ActivityAction::Update, ROLE_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn delete_user_role(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "role")?;

        if user_roles::count_assigned_users(&state.db, id).await.db()? > 0 {
            return Err(Error::new("Role is still assigned to users"));
        }

        soft_delete_and_log(
            state,
            &actor,
            SoftDeletable::UserRoles,
            id,
            ROLE_ENTITY,
            "Role",
        )
        .await
    }

    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<User> {
        let actor = require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;

        let username = non_blank("Username", input.username)?;
        let full_name = non_blank("Full name", input.full_name)?;
        let role_id = parse_id(&input.role_id, "role")?;
        PasswordService::validate_password_strength(&input.password).map_err(GqlError::from)?;

        ensure_live(state, SoftDeletable::UserRoles, role_id, "Role").await?;
        if users::get_by_username(&state.db, &username).await.db()?.is_some() {
            return Err(Error::new("Username already exists"));
        }

        let password_hash = PasswordService::hash_blocking(input.password)
            .await
            .map_err(GqlError::from)?;

        let row = users::create(
            &state.db,
            CreateUserData {
                username,
                full_name,
                email: input.email,
                password_hash,
                role_id,
            },
            Some(actor.id),
        )
        .await
        .db_unique("Username already exists")?;

        log_change(state, &actor, ActivityAction::Create, USER_ENTITY, row.id).await;
        Ok(row.into())
    }

    async fn update_user(&self, ctx: &Context<'_>, id: ID, input: UpdateUserInput) -> Result<User> {
        let actor = require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "user")?;

        let full_name = non_blank_opt("Full name", input.full_name)?;
        let role_id = input
            .role_id
            .as_ref()
            .map(|r| parse_id(r, "role"))
            .transpose()?;
        if let Some(role_id) = role_id {
            ensure_live(state, SoftDeletable::UserRoles, role_id, "Role").await?;
        }

        let row = users::update(
            &state.db,
            id,
            UpdateUserData {
                full_name,
                email: input.email,
                role_id,
                is_active: input.is_active,
            },
            actor.id,
        )
        .await
        .db()?
        .ok_or_else(|| GqlError::not_found("User"))?;

        if !row.is_active {
            let revoked = user_sessions::revoke_all_for_user(&state.db, row.id).await.db()?;
            tracing::info!(user_id = %row.id, revoked, "Revoked sessions of disabled user");
        }

        log_change(state, &actor, ActivityAction::Update, USER_ENTITY, row.id).await;
        Ok(row.into())
    }

    /// Replace a user's password and end all of their sessions.
    async fn set_user_password(&self, ctx: &Context<'_>, id: ID, password: String) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "user")?;

        PasswordService::validate_password_strength(&password).map_err(GqlError::from)?;
        let password_hash = PasswordService::hash_blocking(password)
            .await
            .map_err(GqlError::from)?;

        if !users::set_password_hash(&state.db, id, &password_hash, actor.id)
            .await
            .db()?
        {
            return Err(GqlError::not_found("User").into());
        }
        user_sessions::revoke_all_for_user(&state.db, id).await.db()?;

        log_change(state, &actor, ActivityAction::Update, USER_ENTITY, id).await;
        Ok(true)
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_privilege(ctx, Privilege::UserManagement).await?;
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id, "user")?;

        if id == actor.id {
            return Err(Error::new("You cannot delete your own account"));
        }

        let deleted =
            soft_delete_and_log(state, &actor, SoftDeletable::Users, id, USER_ENTITY, "User")
                .await?;
        user_sessions::revoke_all_for_user(&state.db, id).await.db()?;

        Ok(deleted)
    }
}
