mod common;

use common::*;

#[tokio::test]
async fn mutations_require_a_session() {
    let state = offline_state();
    let schema = test_schema(&state);

    let query = r#"
        mutation {
            createFarmerProfile(tokenized: "anything") { id }
        }
    "#;

    let response = execute_graphql(&schema, query, None, None).await;

    assert_eq!(
        first_error(&response),
        "You must be logged in to perform this action"
    );
}

#[tokio::test]
async fn queries_require_a_session() {
    let state = offline_state();
    let schema = test_schema(&state);

    let query = r#"
        query {
            farmerProfiles { totalCount }
        }
    "#;

    let response = execute_graphql(&schema, query, None, None).await;

    assert_eq!(
        first_error(&response),
        "You must be logged in to perform this action"
    );
}

#[tokio::test]
async fn introspection_can_be_disabled() {
    let state = offline_state();
    let schema = test_schema(&state);

    let response =
        execute_graphql(&schema, "{ __schema { queryType { name } } }", None, None).await;

    let data = response.data.clone().into_json().unwrap_or_default();
    assert!(
        response.is_err() || data["__schema"].is_null(),
        "introspection should not expose the schema: {data}"
    );
}

#[tokio::test]
async fn sdl_exposes_domain_types() {
    let state = offline_state();
    let sdl = test_schema(&state).sdl();

    for expected in [
        "type FarmerProfilePage",
        "type RetailPricePage",
        "farmerProfilesTokenized",
        "activityLogged",
        "enum BiosecurityStatus",
    ] {
        assert!(sdl.contains(expected), "SDL is missing `{expected}`");
    }
}
