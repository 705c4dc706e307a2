use async_graphql::Value;

use app_schema::{ResolverRegistry, ResolverRequest};

/// The resolver mapping wired into the gateway. With mocking enabled and
/// `mock_entire_schema` unset, these run for their fields; every other
/// field falls back to a generated mock value.
pub fn create_resolvers() -> ResolverRegistry {
    let mut registry = ResolverRegistry::new();

    registry.register_value("Query", "hello", Value::from("Hello from the gateway"));

    registry.register("Query", "greeting", |request: ResolverRequest| async move {
        let name = request.string_arg("name").unwrap_or("stranger").to_string();
        Ok(Value::from(format!("Hello, {}!", name)))
    });

    registry.register_value("Mutation", "ping", Value::from("pong"));

    registry
}
