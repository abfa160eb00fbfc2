use std::env;

use api::auth::session::open_session;
use api::auth::{AuthConfig, Claims};
use api::gql::{build_schema_with, AppSchema};
use api::AppState;
use async_graphql::{Request, Variables};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use infra::repos::{user_roles, users, CreateUserData, CreateUserRole};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_TOKENIZE_SECRET: &str = "test-tokenize-secret";
pub const TEST_SSO_SECRET: &str = "test-sso-secret";
pub const TEST_PASSWORD: &str = "harvest-2026";

pub fn test_config() -> AuthConfig {
    AuthConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
        "TOKENIZE_SECRET" => Some(TEST_TOKENIZE_SECRET.to_string()),
        "SSO_SECRET" => Some(TEST_SSO_SECRET.to_string()),
        "DASHBOARD_URL" => Some("https://dashboard.test".to_string()),
        _ => None,
    })
    .expect("test auth config")
}

/// Connect and migrate the database named by `TEST_DATABASE_URL`.
/// Returns `None` (and the test is skipped) when it is not set.
pub async fn setup_test_db() -> Option<AppState> {
    let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(AppState::with_config(pool, test_config()))
}

/// State over a lazy pool that never connects, for tests that must not
/// reach the database.
#[allow(dead_code)]
pub fn offline_state() -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    AppState::with_config(pool, test_config())
}

#[allow(dead_code)]
pub fn test_schema(state: &AppState) -> AppSchema {
    build_schema_with(state.clone(), false)
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub role_id: Uuid,
    pub claims: Claims,
}

/// Create a role with `privileges`, a user holding it, and an open session.
#[allow(dead_code)]
pub async fn create_test_user(state: &AppState, privileges: &[&str]) -> TestUser {
    let role = user_roles::create(
        &state.db,
        CreateUserRole {
            name: unique("role"),
            description: None,
            privileges: privileges.iter().map(|p| p.to_string()).collect(),
        },
        Uuid::nil(),
    )
    .await
    .expect("Failed to create test role");

    let username = unique("officer");
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4).expect("hash");
    let user = users::create(
        &state.db,
        CreateUserData {
            username: username.clone(),
            full_name: "Test Officer".to_string(),
            email: None,
            password_hash,
            role_id: role.id,
        },
        None,
    )
    .await
    .expect("Failed to create test user");

    let claims = claims_for(state, user.id, &username).await;

    TestUser {
        id: user.id,
        username,
        role_id: role.id,
        claims,
    }
}

/// Open a fresh session for an existing user and return its claims.
pub async fn claims_for(state: &AppState, user_id: Uuid, username: &str) -> Claims {
    let opened = open_session(state, user_id, username)
        .await
        .expect("Failed to open session");
    state
        .jwt_service()
        .verify_token(&opened.token)
        .expect("Issued token must verify")
}

/// Sign a mutation payload the way the dashboard does.
#[allow(dead_code)]
pub fn tokenize(payload: &Value) -> String {
    encode(
        &Header::default(),
        payload,
        &EncodingKey::from_secret(TEST_TOKENIZE_SECRET.as_bytes()),
    )
    .expect("sign payload")
}

#[allow(dead_code)]
pub async fn execute_graphql(
    schema: &AppSchema,
    query: &str,
    variables: Option<Value>,
    claims: Option<&Claims>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(Variables::from_json(vars));
    }

    if let Some(claims) = claims {
        request = request.data(claims.clone());
    }

    schema.execute(request).await
}

/// First error message of a response, or an empty string.
#[allow(dead_code)]
pub fn first_error(response: &async_graphql::Response) -> String {
    response
        .errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_default()
}
