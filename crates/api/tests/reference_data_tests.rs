mod common;

use api::routes::vegetables::vegetable_list;
use axum::extract::State;
use chrono::NaiveDate;
use common::*;
use serde_json::json;
use uuid::Uuid;

use infra::repos::crop_commodities::VEGETABLE_CATEGORY_CODE;
use infra::repos::{
    crop_categories, crop_commodities, retail_prices, CreateCropCategory, CreateCropCommodity,
    CreateRetailPrice,
};

async fn vegetable_category(state: &api::AppState) -> Uuid {
    if let Some(existing) = crop_categories::find_by_code(&state.db, VEGETABLE_CATEGORY_CODE, None)
        .await
        .unwrap()
    {
        return existing.id;
    }

    crop_categories::create(
        &state.db,
        CreateCropCategory {
            code: VEGETABLE_CATEGORY_CODE.to_string(),
            name: "Vegetables".to_string(),
            description: None,
        },
        Uuid::nil(),
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn roles_in_use_cannot_be_deleted() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["USER_MANAGEMENT"]).await;

    let delete_role = "mutation Delete($id: ID!) { deleteUserRole(id: $id) }";

    let response = execute_graphql(
        &schema,
        delete_role,
        Some(json!({ "id": admin.role_id.to_string() })),
        Some(&admin.claims),
    )
    .await;
    assert_eq!(first_error(&response), "Role is still assigned to users");

    let created = execute_graphql(
        &schema,
        r#"
            mutation Create($name: String!) {
                createUserRole(input: { name: $name, privileges: ["LIVESTOCK"] }) { id }
            }
        "#,
        Some(json!({ "name": unique("spare") })),
        Some(&admin.claims),
    )
    .await;
    assert!(created.errors.is_empty(), "createUserRole failed: {:?}", created.errors);
    let spare_id = created.data.into_json().unwrap()["createUserRole"]["id"].clone();

    let deleted = execute_graphql(
        &schema,
        delete_role,
        Some(json!({ "id": spare_id })),
        Some(&admin.claims),
    )
    .await;
    assert!(deleted.errors.is_empty(), "deleteUserRole failed: {:?}", deleted.errors);
}

#[tokio::test]
async fn unknown_privileges_are_rejected() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["*"]).await;

    let response = execute_graphql(
        &schema,
        r#"
            mutation Create($name: String!) {
                createUserRole(input: { name: $name, privileges: ["GOD_MODE"] }) { id }
            }
        "#,
        Some(json!({ "name": unique("bad") })),
        Some(&admin.claims),
    )
    .await;
    assert_eq!(first_error(&response), "Unknown privilege: GOD_MODE");
}

#[tokio::test]
async fn vegetable_list_shows_the_latest_price() {
    let Some(state) = setup_test_db().await else { return };
    let category_id = vegetable_category(&state).await;

    let commodity = crop_commodities::create(
        &state.db,
        CreateCropCommodity {
            category_id,
            name: unique("Bok choy"),
            unit: "bundle".to_string(),
            scientific_name: None,
        },
        Uuid::nil(),
    )
    .await
    .unwrap();

    for (day, price) in [(1, 2.5), (8, 3.0)] {
        retail_prices::create(
            &state.db,
            CreateRetailPrice {
                commodity_id: commodity.id,
                market: "Talamahu".to_string(),
                price,
                unit: "bundle".to_string(),
                price_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            },
            Uuid::nil(),
        )
        .await
        .unwrap();
    }

    let unpriced = crop_commodities::create(
        &state.db,
        CreateCropCommodity {
            category_id,
            name: unique("Okra"),
            unit: "kg".to_string(),
            scientific_name: None,
        },
        Uuid::nil(),
    )
    .await
    .unwrap();

    let axum::Json(rows) = vegetable_list(State(state.clone())).await.unwrap();

    let priced = rows.iter().find(|r| r.commodity_id == commodity.id).unwrap();
    assert_eq!(priced.latest_price, Some(3.0));
    assert_eq!(priced.market.as_deref(), Some("Talamahu"));

    let empty = rows.iter().find(|r| r.commodity_id == unpriced.id).unwrap();
    assert!(empty.latest_price.is_none());
}

#[tokio::test]
async fn retail_prices_must_be_positive() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let user = create_test_user(&state, &["RETAIL_PRICES"]).await;
    let category_id = vegetable_category(&state).await;

    let commodity = crop_commodities::create(
        &state.db,
        CreateCropCommodity {
            category_id,
            name: unique("Cabbage"),
            unit: "head".to_string(),
            scientific_name: None,
        },
        Uuid::nil(),
    )
    .await
    .unwrap();

    let payload = json!({
        "commodityId": commodity.id,
        "market": "Vaiola",
        "price": 0.0,
        "unit": "head",
        "priceDate": "2026-03-10"
    });

    let response = execute_graphql(
        &schema,
        "mutation P($tokenized: String!) { createRetailPrice(tokenized: $tokenized) { id } }",
        Some(json!({ "tokenized": tokenize(&payload) })),
        Some(&user.claims),
    )
    .await;
    assert_eq!(first_error(&response), "Price must be greater than zero");
}

#[tokio::test]
async fn categories_with_commodities_cannot_be_deleted() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let user = create_test_user(&state, &["CROP_TAXONOMY"]).await;

    let category = crop_categories::create(
        &state.db,
        CreateCropCategory {
            code: unique("ROOT").to_uppercase(),
            name: "Root crops".to_string(),
            description: None,
        },
        Uuid::nil(),
    )
    .await
    .unwrap();
    crop_commodities::create(
        &state.db,
        CreateCropCommodity {
            category_id: category.id,
            name: unique("Taro"),
            unit: "kg".to_string(),
            scientific_name: Some("Colocasia esculenta".to_string()),
        },
        Uuid::nil(),
    )
    .await
    .unwrap();

    let response = execute_graphql(
        &schema,
        "mutation D($id: ID!) { deleteCropCategory(id: $id) }",
        Some(json!({ "id": category.id.to_string() })),
        Some(&user.claims),
    )
    .await;
    assert_eq!(first_error(&response), "Category still has commodities");
}

#[tokio::test]
async fn duplicate_inserts_surface_as_conflicts() {
    use api::gql::error::DbResultExt;

    let Some(state) = setup_test_db().await else { return };
    let code = unique("DUP").to_uppercase();
    let category = |code: &str| CreateCropCategory {
        code: code.to_string(),
        name: "Duplicate".to_string(),
        description: None,
    };

    crop_categories::create(&state.db, category(&code), Uuid::nil())
        .await
        .unwrap();
    let err = crop_categories::create(&state.db, category(&code), Uuid::nil())
        .await
        .db_unique("Category code already exists")
        .unwrap_err();
    assert_eq!(err.to_string(), "Category code already exists");
}

#[tokio::test]
async fn concurrent_role_creation_reports_the_conflict() {
    let Some(state) = setup_test_db().await else { return };
    let schema = test_schema(&state);
    let admin = create_test_user(&state, &["USER_MANAGEMENT"]).await;

    let create = r#"
        mutation Create($name: String!) {
            createUserRole(input: { name: $name, privileges: ["LIVESTOCK"] }) { id }
        }
    "#;
    let vars = json!({ "name": unique("twin") });

    let (a, b) = tokio::join!(
        execute_graphql(&schema, create, Some(vars.clone()), Some(&admin.claims)),
        execute_graphql(&schema, create, Some(vars.clone()), Some(&admin.claims)),
    );

    // Whichever request loses, by pre-check or by index, sees the same message.
    let errors: Vec<String> = [&a, &b]
        .into_iter()
        .filter(|r| !r.errors.is_empty())
        .map(first_error)
        .collect();
    assert_eq!(errors, vec!["Role name already exists".to_string()]);
}
