mod common;

use api::routes::callback::{callback, CallbackQuery};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use common::*;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

const LOGIN: &str = r#"
    mutation Login($username: String!, $password: String!) {
        login(username: $username, password: $password) {
            token
            user { id username }
        }
    }
"#;

const CURRENT_USER: &str = "query { currentUser { id username role { name } } }";

#[tokio::test]
async fn login_issues_a_usable_token() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let user = create_test_user(&state, &["FARMER_PROFILES"]).await;

    let response = execute_graphql(
        &schema,
        LOGIN,
        Some(json!({ "username": user.username, "password": TEST_PASSWORD })),
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "login failed: {:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let token = data["login"]["token"].as_str().unwrap();
    assert_eq!(data["login"]["user"]["username"], user.username);

    let claims = state.jwt_service().verify_token(token).unwrap();
    let me = execute_graphql(&schema, CURRENT_USER, None, Some(&claims)).await;
    assert!(me.errors.is_empty(), "currentUser failed: {:?}", me.errors);
    assert_eq!(
        me.data.into_json().unwrap()["currentUser"]["id"],
        user.id.to_string()
    );
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let user = create_test_user(&state, &[]).await;

    let wrong_password = execute_graphql(
        &schema,
        LOGIN,
        Some(json!({ "username": user.username, "password": "not-the-password" })),
        None,
    )
    .await;
    let unknown_user = execute_graphql(
        &schema,
        LOGIN,
        Some(json!({ "username": unique("ghost"), "password": TEST_PASSWORD })),
        None,
    )
    .await;

    assert_eq!(first_error(&wrong_password), "Invalid username or password");
    assert_eq!(first_error(&unknown_user), "Invalid username or password");
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let user = create_test_user(&state, &[]).await;

    let response =
        execute_graphql(&schema, "mutation { logout }", None, Some(&user.claims)).await;
    assert!(response.errors.is_empty(), "logout failed: {:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap()["logout"], true);

    let me = execute_graphql(&schema, CURRENT_USER, None, Some(&user.claims)).await;
    assert_eq!(first_error(&me), "Session expired or revoked");
}

#[tokio::test]
async fn deactivating_a_user_revokes_their_sessions() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["USER_MANAGEMENT"]).await;
    let officer = create_test_user(&state, &[]).await;

    let response = execute_graphql(
        &schema,
        r#"
            mutation Deactivate($id: ID!) {
                updateUser(id: $id, input: { isActive: false }) { id isActive }
            }
        "#,
        Some(json!({ "id": officer.id.to_string() })),
        Some(&admin.claims),
    )
    .await;
    assert!(response.errors.is_empty(), "updateUser failed: {:?}", response.errors);

    let me = execute_graphql(&schema, CURRENT_USER, None, Some(&officer.claims)).await;
    assert_eq!(first_error(&me), "Session expired or revoked");
}

#[tokio::test]
async fn user_management_needs_the_privilege() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let officer = create_test_user(&state, &["FARMER_PROFILES"]).await;

    let response = execute_graphql(
        &schema,
        "query { users { totalCount } }",
        None,
        Some(&officer.claims),
    )
    .await;

    assert_eq!(
        first_error(&response),
        "Access denied: USER_MANAGEMENT privilege required"
    );
}

fn sign_portal_token(username: &str, secret: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "username": username }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn portal_callback_redirects_with_a_fresh_token() {
    let Some(state) = setup_test_db().await else { return };
    let user = create_test_user(&state, &[]).await;

    let portal_token = sign_portal_token(&user.username, TEST_SSO_SECRET);

    let redirect = callback(
        State(state.clone()),
        Query(CallbackQuery {
            token: portal_token,
        }),
    )
    .await
    .expect("callback should accept a valid portal token")
    .into_response();

    assert_eq!(redirect.status(), axum::http::StatusCode::SEE_OTHER);
    let location = redirect.headers()["location"].to_str().unwrap();
    let token = location
        .strip_prefix("https://dashboard.test/auth/callback?token=")
        .expect("redirect goes to the dashboard");

    let claims = state.jwt_service().verify_token(token).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
}

#[tokio::test]
async fn portal_callback_rejects_foreign_tokens() {
    let Some(state) = setup_test_db().await else { return };

    let forged = sign_portal_token("anyone", "not-the-portal");

    let result = callback(State(state), Query(CallbackQuery { token: forged })).await;
    let response = result.expect_err("forged token must be rejected").into_response();
    assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn portal_callback_rejects_tokens_signed_with_shared_secrets() {
    // Rejected before any lookup, so no database is needed.
    let state = offline_state();

    for secret in [TEST_TOKENIZE_SECRET, TEST_JWT_SECRET] {
        let token = sign_portal_token("admin", secret);
        let result = callback(State(state.clone()), Query(CallbackQuery { token })).await;
        let response = result.expect_err("must be rejected").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn portal_callback_is_not_found_without_an_sso_secret() {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .unwrap();
    let config = api::auth::AuthConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
        "TOKENIZE_SECRET" => Some(TEST_TOKENIZE_SECRET.to_string()),
        _ => None,
    })
    .unwrap();
    let state = api::AppState::with_config(pool, config);

    let token = sign_portal_token("admin", TEST_JWT_SECRET);
    let result = callback(State(state), Query(CallbackQuery { token })).await;
    let response = result.expect_err("SSO is disabled").into_response();
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
