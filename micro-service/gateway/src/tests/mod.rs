use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value as Json, json};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{routes::create_routes, schema::create_schema, service::GatewayService};
use app_config::AppConfig;

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.gateway.mocks.seed = Some(42);
    config
}

fn test_app(config: &AppConfig) -> Router {
    let schema = create_schema(config).expect("schema assembles");
    create_routes(Arc::new(GatewayService::new(schema)), config)
}

async fn post_graphql(app: Router, body: Json) -> (StatusCode, Json) {
    let request = Request::builder()
        .uri("/graphql")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("request is handled");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let json = serde_json::from_slice(&bytes).expect("body is JSON");
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let config = test_config();
    let app = test_app(&config);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("request is handled");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_playground_is_served_when_enabled() {
    let config = test_config();
    let app = test_app(&config);

    let request = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("request is handled");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_playground_is_absent_when_disabled() {
    let mut config = test_config();
    config.gateway.playground = false;
    let app = test_app(&config);

    let request = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("request is handled");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registered_resolver_returns_its_value() {
    let config = test_config();
    let app = test_app(&config);

    let (status, body) = post_graphql(app, json!({ "query": "{ hello }" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hello"], json!("Hello from the gateway"));
    assert!(body.get("errors").is_none(), "no errors expected: {}", body);
}

#[tokio::test]
async fn test_uppercase_directive_transforms_resolver_output() {
    let config = test_config();
    let app = test_app(&config);

    let (status, body) = post_graphql(
        app,
        json!({ "query": r#"{ greeting(name: "ada") }"# }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["greeting"], json!("HELLO, ADA!"));
}

#[tokio::test]
async fn test_unresolved_fields_return_type_correct_mocks() {
    let config = test_config();
    let app = test_app(&config);

    let (status, body) = post_graphql(
        app,
        json!({ "query": "{ users { id username email role createdAt } }" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let users = body["data"]["users"].as_array().expect("users is a list");
    assert_eq!(users.len(), 2, "mocked lists honor the configured length");

    for user in users {
        assert!(user["id"].is_string());
        assert!(user["username"].is_string());
        assert!(user["email"].is_string());
        let role = user["role"].as_str().expect("role is an enum value");
        assert!(["ADMIN", "MEMBER", "GUEST"].contains(&role));
        assert!(user["createdAt"].is_string());
    }
}

#[tokio::test]
async fn test_mock_entire_schema_ignores_registered_resolvers() {
    let mut config = test_config();
    config.gateway.mocks.mock_entire_schema = true;
    let app = test_app(&config);

    let (status, body) = post_graphql(app, json!({ "query": "{ hello }" })).await;

    assert_eq!(status, StatusCode::OK);
    let hello = body["data"]["hello"].as_str().expect("hello is a string");
    assert_ne!(hello, "Hello from the gateway", "resolver must not run");
    assert!(!hello.is_empty());
}

#[tokio::test]
async fn test_invalid_query_text_yields_error_envelope() {
    let config = test_config();
    let app = test_app(&config);

    let (status, body) = post_graphql(app, json!({ "query": "{ hello" })).await;

    assert_eq!(status, StatusCode::OK, "parse failures are not transport failures");
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_unknown_field_yields_error_envelope() {
    let config = test_config();
    let app = test_app(&config);

    let (status, body) = post_graphql(app, json!({ "query": "{ doesNotExist }" })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_variables_and_operation_name_are_honored() {
    let config = test_config();
    let app = test_app(&config);

    let (status, body) = post_graphql(
        app,
        json!({
            "query": "query Greet($name: String!) { greeting(name: $name) } query Other { hello }",
            "operationName": "Greet",
            "variables": { "name": "grace" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["greeting"], json!("HELLO, GRACE!"));
    assert!(body["data"].get("hello").is_none());
}

#[tokio::test]
async fn test_fixed_seed_makes_identical_requests_identical() {
    let config = test_config();

    let (_, first) = post_graphql(
        test_app(&config),
        json!({ "query": "{ users { id username } }" }),
    )
    .await;
    let (_, second) = post_graphql(
        test_app(&config),
        json!({ "query": "{ users { id username } }" }),
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_mutation_resolver_is_served() {
    let config = test_config();
    let app = test_app(&config);

    let (status, body) = post_graphql(app, json!({ "query": "mutation { ping }" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ping"], json!("pong"));
}

#[test]
fn test_malformed_schema_document_fails_construction() {
    use app_schema::GatewayAssembler;

    let err = GatewayAssembler::new("type Query {").build();
    assert!(err.is_err(), "no handler may be produced from a bad document");
}
