use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::{
    extract::{State, WebSocketUpgrade},
    http::{
        header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware,
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::Claims;
use crate::error::AppError;
use crate::gql::AppSchema;
use crate::middleware::jwt::jwt_middleware;
use crate::routes::{callback, vegetables};
use crate::state::AppState;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The full HTTP surface: health probe, public vegetable prices, the SSO
/// callback and GraphQL over HTTP and websocket. Bearer tokens are only
/// inspected on `/graphql`.
pub fn build_router(state: AppState, schema: AppSchema) -> anyhow::Result<Router> {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());

    let router = Router::new()
        .route("/health", get(health))
        .route("/vegetable-list", get(vegetables::vegetable_list))
        .merge(sso_routes()?)
        .merge(graphql_routes(schema).route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_middleware,
        )))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors_layer(&allowed_origins));

    Ok(router)
}

/// `/callback`, limited to roughly ten requests a minute per client IP.
fn sso_routes() -> anyhow::Result<Router<AppState>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .finish()
        .context("invalid rate limit configuration")?;

    Ok(Router::new()
        .route("/callback", get(callback::callback))
        .layer(GovernorLayer::new(Arc::new(governor_conf))))
}

fn graphql_routes(schema: AppSchema) -> Router<AppState> {
    let ws_schema = schema.clone();

    Router::new().route(
        "/graphql",
        get(move |state, protocol, upgrade| graphql_ws_handler(state, protocol, upgrade, ws_schema))
            .post(move |state, claims, req| graphql_handler(state, claims, req, schema)),
    )
}

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|o| o.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

/// Runs one GraphQL request with the shared state and, when the JWT
/// middleware accepted a bearer token, its claims.
async fn graphql_handler(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    req: GraphQLRequest,
    schema: AppSchema,
) -> GraphQLResponse {
    let mut request = req.into_inner().data(state);
    if let Some(Extension(claims)) = claims {
        request = request.data(claims);
    }

    let operation = request.operation_name.clone();
    let response = schema.execute(request).await;

    for error in &response.errors {
        tracing::warn!(operation = ?operation, "GraphQL error: {}", error.message);
    }

    response.into()
}

/// Bearer token from `connection_init` params shaped as
/// `{ "headers": { "Authorization": "Bearer <jwt>" } }`.
fn connection_token(params: &Value) -> Option<&str> {
    let headers = params.get("headers")?;
    headers
        .get("Authorization")
        .or_else(|| headers.get("authorization"))?
        .as_str()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Subscriptions over websocket. A token in the connection params must
/// verify; connections without one stay anonymous and are refused by
/// resolvers that need a session.
async fn graphql_ws_handler(
    State(state): State<AppState>,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
    schema: AppSchema,
) -> Response {
    let jwt_service = state.jwt_service().clone();

    upgrade
        .protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |stream| {
            GraphQLWebSocket::new(stream, schema, protocol)
                .on_connection_init(move |params: Value| async move {
                    let mut data = async_graphql::Data::default();
                    data.insert(state);

                    if let Some(token) = connection_token(&params) {
                        let claims = jwt_service
                            .verify_token(token)
                            .map_err(|_| async_graphql::Error::new("Invalid or expired token"))?;
                        data.insert(claims);
                    }

                    Ok(data)
                })
                .serve()
        })
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&state.db).await?;
    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_token_reads_either_header_case() {
        let upper = json!({ "headers": { "Authorization": "Bearer abc" } });
        let lower = json!({ "headers": { "authorization": "Bearer xyz" } });
        assert_eq!(connection_token(&upper), Some("abc"));
        assert_eq!(connection_token(&lower), Some("xyz"));
    }

    #[test]
    fn connection_token_ignores_missing_or_foreign_schemes() {
        assert_eq!(connection_token(&json!({})), None);
        assert_eq!(connection_token(&json!({ "headers": { "Authorization": "Basic abc" } })), None);
        assert_eq!(connection_token(&json!({ "headers": { "Authorization": "Bearer " } })), None);
    }

    #[test]
    fn invalid_origins_are_skipped() {
        // Building the layer must not panic on junk entries.
        let _ = cors_layer("http://localhost:3000, not a header\u{7f}, https://agri.example.gov");
    }

    mod bearer_scope {
        use std::net::SocketAddr;

        use axum::{body::Body, extract::ConnectInfo, http::Request};
        use sqlx::postgres::PgPoolOptions;
        use tower::ServiceExt;

        use super::super::*;
        use crate::auth::AuthConfig;
        use crate::gql::build_schema_with;

        fn offline_router() -> Router {
            let pool = PgPoolOptions::new()
                .connect_lazy("postgres://nobody@127.0.0.1:1/none")
                .unwrap();
            let config = AuthConfig::from_lookup(|key| match key {
                "JWT_SECRET" => Some("server".to_string()),
                "TOKENIZE_SECRET" => Some("browser".to_string()),
                _ => None,
            })
            .unwrap();
            let state = AppState::with_config(pool, config);
            let schema = build_schema_with(state.clone(), false);
            build_router(state, schema).unwrap()
        }

        fn with_stale_bearer(method: Method, uri: &str) -> Request<Body> {
            let mut request = Request::builder()
                .method(method)
                .uri(uri)
                .header(AUTHORIZATION, "Bearer stale.session.token")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query":"{ __typename }"}"#))
                .unwrap();
            request
                .extensions_mut()
                .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
            request
        }

        #[tokio::test]
        async fn stale_bearer_is_ignored_outside_graphql() {
            // SSO is off in this config, so the callback answers 404 on its own.
            let response = offline_router()
                .oneshot(with_stale_bearer(Method::GET, "/callback?token=abc"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn stale_bearer_is_refused_on_graphql() {
            let response = offline_router()
                .oneshot(with_stale_bearer(Method::POST, "/graphql"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
