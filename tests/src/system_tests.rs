use std::io::Write;
use std::sync::Arc;

use async_graphql::Value;

use app_config::{AppConfig, MockOptions};
use app_error::AppError;
use app_schema::{GatewayAssembler, GatewaySchema, ResolverRegistry};
use micro_gateway::directives::create_directives;
use micro_gateway::schema::create_schema;
use micro_gateway::service::{GatewayService, GatewayServiceTrait};

#[test]
fn startup_aborts_on_malformed_schema_document() {
    let err = GatewayAssembler::new("type Query {")
        .build()
        .expect_err("must not produce a handler");
    assert!(matches!(err, AppError::SchemaError(_)));
}

#[test]
fn startup_aborts_when_directive_mapping_outruns_the_schema() {
    // The gateway's directive mapping registers @uppercase, which this
    // document never declares
    let err = GatewayAssembler::new("type Query { hello: String }")
        .directives(create_directives())
        .build()
        .expect_err("must not produce a handler");
    assert!(matches!(err, AppError::DirectiveConflict(_)));
}

#[test]
fn configured_schema_document_overrides_the_embedded_one() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"directive @uppercase on FIELD_DEFINITION\ntype Query { ok: Boolean! }")
        .expect("write schema");

    let mut config = AppConfig::default();
    config.gateway.schema_path = Some(file.path().display().to_string());
    config.gateway.mocks.seed = Some(1);
    config.validate().expect("config is valid");

    let schema = create_schema(&config).expect("assembles from the override");
    assert!(schema.sdl().contains("ok: Boolean!"));
}

#[test]
fn invalid_configuration_never_reaches_assembly() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));

    let mut config = AppConfig::default();
    config.gateway.mocks.list_length = 0;
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn service_trait_fronts_the_assembled_schema() {
    let mut config = AppConfig::default();
    config.gateway.mocks.seed = Some(3);

    let schema = create_schema(&config).expect("schema assembles");
    let service: Arc<dyn GatewayServiceTrait> = Arc::new(GatewayService::new(schema));

    let response = service
        .execute(async_graphql::Request::new("{ hello }"))
        .await;
    assert!(response.errors.is_empty());
    match &response.data {
        Value::Object(map) => {
            assert_eq!(map.get("hello"), Some(&Value::from("Hello from the gateway")))
        }
        other => panic!("expected object data, got {:?}", other),
    }
    assert!(service.sdl().contains("type Query"));
}

#[tokio::test]
async fn gateway_handles_many_concurrent_requests() {
    fn build() -> GatewaySchema {
        let mut resolvers = ResolverRegistry::new();
        resolvers.register_value("Query", "hello", Value::from("steady"));
        GatewayAssembler::new("type Query { hello: String!, extra: Int! }")
            .resolvers(resolvers)
            .options(MockOptions {
                seed: Some(5),
                ..MockOptions::default()
            })
            .build()
            .expect("assembles")
    }

    let gateway = Arc::new(build());
    let mut handles = Vec::new();
    for _ in 0..16 {
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(async move {
            gateway.execute("{ hello extra }").await
        }));
    }

    for handle in handles {
        let response = handle.await.expect("task completes");
        assert!(response.errors.is_empty());
        match &response.data {
            Value::Object(map) => {
                assert_eq!(map.get("hello"), Some(&Value::from("steady")));
                assert!(matches!(map.get("extra"), Some(Value::Number(_))));
            }
            other => panic!("expected object data, got {:?}", other),
        }
    }
}
