use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value as Json, json};
use std::sync::Arc;
use tower::ServiceExt;

use app_config::AppConfig;
use micro_gateway::{routes::create_routes, schema::create_schema, service::GatewayService};

fn gateway_app() -> Router {
    let mut config = AppConfig::default();
    config.gateway.mocks.seed = Some(7);

    let schema = create_schema(&config).expect("schema assembles");
    create_routes(Arc::new(GatewayService::new(schema)), &config)
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
    (status, serde_json::from_slice(&bytes).expect("body is JSON"))
}

#[tokio::test]
async fn mixed_resolved_and_mocked_selection_round_trips() {
    let app = gateway_app();

    let (status, body) = post_graphql(
        app,
        json!({
            "query": r#"{
                hello
                viewer { id username role }
                search(term: "gateway") { __typename }
            }"#
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("errors").is_none(), "unexpected errors: {}", body);

    // Resolved field carries the registered constant
    assert_eq!(body["data"]["hello"], json!("Hello from the gateway"));

    // Mocked object descends with type-correct leaves
    let viewer = &body["data"]["viewer"];
    assert!(viewer["id"].is_string());
    assert!(viewer["username"].is_string());
    assert!(
        ["ADMIN", "MEMBER", "GUEST"]
            .contains(&viewer["role"].as_str().expect("role is a string"))
    );

    // Union members resolve to a declared possible type
    for hit in body["data"]["search"].as_array().expect("search is a list") {
        let type_name = hit["__typename"].as_str().expect("__typename present");
        assert!(["User", "Profile"].contains(&type_name));
    }
}

#[tokio::test]
async fn mutation_with_input_variables_returns_mocked_payload() {
    let app = gateway_app();

    let (status, body) = post_graphql(
        app,
        json!({
            "query": r#"
                mutation Register($input: RegisterInput!) {
                    register(input: $input) {
                        token
                        user { id username }
                    }
                }
            "#,
            "variables": {
                "input": {
                    "username": "testuser",
                    "email": "test@example.com",
                    "password": "Password123!"
                }
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("errors").is_none(), "unexpected errors: {}", body);
    assert!(body["data"]["register"]["token"].is_string());
    assert!(body["data"]["register"]["user"]["id"].is_string());
    assert!(body["data"]["register"]["user"]["username"].is_string());
}

#[tokio::test]
async fn introspection_reports_the_root_types() {
    let app = gateway_app();

    let (status, body) = post_graphql(
        app,
        json!({
            "query": "{ __schema { queryType { name } mutationType { name } } }"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["__schema"]["queryType"]["name"], json!("Query"));
    assert_eq!(
        body["data"]["__schema"]["mutationType"]["name"],
        json!("Mutation")
    );
}

#[tokio::test]
async fn failures_always_arrive_as_graphql_envelopes() {
    // Unparseable query text
    let (status, body) = post_graphql(gateway_app(), json!({ "query": "{ hello" })).await;
    assert_eq!(status, StatusCode::OK);
    let errors = body["errors"].as_array().expect("errors present");
    assert!(!errors.is_empty());
    assert!(errors[0]["message"].is_string());

    // Valid text, unknown selection
    let (status, body) =
        post_graphql(gateway_app(), json!({ "query": "{ nope }" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn operation_name_selects_the_operation() {
    let app = gateway_app();

    let (status, body) = post_graphql(
        app,
        json!({
            "query": "query A { hello } query B { greeting(name: \"b\") }",
            "operationName": "B"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["greeting"], json!("HELLO, B!"));
    assert!(body["data"].get("hello").is_none());
}
