use std::sync::Arc;

use async_graphql::{Name, Value, indexmap::IndexMap};

use app_error::AppResult;
use app_schema::{DirectiveRegistry, SchemaDirective};

/// Upper-cases string results of fields annotated `@uppercase`. Lists are
/// transformed element-wise; non-string values pass through untouched.
pub struct UppercaseDirective;

impl SchemaDirective for UppercaseDirective {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn transform(&self, value: Value, _arguments: &IndexMap<Name, Value>) -> AppResult<Value> {
        Ok(uppercase(value))
    }
}

fn uppercase(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_uppercase()),
        Value::List(items) => Value::List(items.into_iter().map(uppercase).collect()),
        other => other,
    }
}

/// The directive mapping wired into the gateway.
pub fn create_directives() -> DirectiveRegistry {
    let mut registry = DirectiveRegistry::new();
    registry.register(Arc::new(UppercaseDirective));
    registry
}
