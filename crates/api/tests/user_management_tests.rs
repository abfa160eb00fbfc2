mod common;

use common::*;
use serde_json::json;

const CURRENT_USER: &str = "query { currentUser { id } }";

const SET_PASSWORD: &str = r#"
    mutation SetPassword($id: ID!, $password: String!) {
        setUserPassword(id: $id, password: $password)
    }
"#;

const DELETE_USER: &str = "mutation Delete($id: ID!) { deleteUser(id: $id) }";

#[tokio::test]
async fn password_reset_ends_every_session() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["USER_MANAGEMENT"]).await;
    let officer = create_test_user(&state, &[]).await;
    let second_device = claims_for(&state, officer.id, &officer.username).await;

    let response = execute_graphql(
        &schema,
        SET_PASSWORD,
        Some(json!({ "id": officer.id.to_string(), "password": "fresh-harvest-77" })),
        Some(&admin.claims),
    )
    .await;
    assert!(response.errors.is_empty(), "setUserPassword failed: {:?}", response.errors);

    for claims in [&officer.claims, &second_device] {
        let me = execute_graphql(&schema, CURRENT_USER, None, Some(claims)).await;
        assert_eq!(first_error(&me), "Session expired or revoked");
    }

    let login = execute_graphql(
        &schema,
        "mutation L($u: String!, $p: String!) { login(username: $u, password: $p) { token } }",
        Some(json!({ "u": officer.username, "p": "fresh-harvest-77" })),
        None,
    )
    .await;
    assert!(login.errors.is_empty(), "login with new password failed: {:?}", login.errors);
}

#[tokio::test]
async fn deleting_a_user_ends_their_sessions() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["USER_MANAGEMENT"]).await;
    let officer = create_test_user(&state, &[]).await;

    let deleted = execute_graphql(
        &schema,
        DELETE_USER,
        Some(json!({ "id": officer.id.to_string() })),
        Some(&admin.claims),
    )
    .await;
    assert!(deleted.errors.is_empty(), "deleteUser failed: {:?}", deleted.errors);

    let me = execute_graphql(&schema, CURRENT_USER, None, Some(&officer.claims)).await;
    assert_eq!(first_error(&me), "Session expired or revoked");

    let live: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_sessions WHERE user_id = $1 AND revoked_at IS NULL",
    )
    .bind(officer.id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(live, 0);

    let again = execute_graphql(
        &schema,
        DELETE_USER,
        Some(json!({ "id": officer.id.to_string() })),
        Some(&admin.claims),
    )
    .await;
    assert_eq!(first_error(&again), "User not found");
}

#[tokio::test]
async fn users_cannot_delete_themselves() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["USER_MANAGEMENT"]).await;

    let response = execute_graphql(
        &schema,
        DELETE_USER,
        Some(json!({ "id": admin.id.to_string() })),
        Some(&admin.claims),
    )
    .await;
    assert_eq!(first_error(&response), "You cannot delete your own account");

    let me = execute_graphql(&schema, CURRENT_USER, None, Some(&admin.claims)).await;
    assert!(me.errors.is_empty(), "session must survive: {:?}", me.errors);
}

#[tokio::test]
async fn user_search_treats_wildcards_literally() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["USER_MANAGEMENT"]).await;

    let search = |pattern: &str| {
        execute_graphql(
            &schema,
            "query S($search: String) { users(filter: { search: $search }) { totalCount } }",
            Some(json!({ "search": pattern })),
            Some(&admin.claims),
        )
    };

    // Test usernames never contain a literal percent sign or underscore.
    for pattern in ["%", "_"] {
        let response = search(pattern).await;
        assert!(response.errors.is_empty(), "users failed: {:?}", response.errors);
        assert_eq!(response.data.into_json().unwrap()["users"]["totalCount"], 0);
    }

    let response = search(&admin.username).await;
    assert_eq!(response.data.into_json().unwrap()["users"]["totalCount"], 1);
}
