use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::{Name, Value, indexmap::IndexMap};
use futures::future::BoxFuture;

use app_error::AppResult;

/// What a resolver sees for one field invocation: the parent value (when
/// the parent was produced by a real resolver; mock parents carry no data)
/// and the coerced field arguments.
#[derive(Debug, Clone)]
pub struct ResolverRequest {
    pub parent: Option<Value>,
    pub args: IndexMap<Name, Value>,
}

impl ResolverRequest {
    /// Convenience accessor for a named argument.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// A named argument coerced to a string, if it is one.
    pub fn string_arg(&self, name: &str) -> Option<&str> {
        match self.arg(name) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

pub type ResolverFuture = BoxFuture<'static, AppResult<Value>>;

/// A field resolver. Returning `Value::Null` resolves the field to null;
/// returning an error surfaces a GraphQL field error next to any sibling
/// data, never a transport failure.
pub type ResolverFn = Arc<dyn Fn(ResolverRequest) -> ResolverFuture + Send + Sync>;

/// The resolver mapping: (type name, field name) to resolver function.
/// Populated once before assembly, immutable afterwards.
#[derive(Default, Clone)]
pub struct ResolverRegistry {
    entries: HashMap<String, HashMap<String, ResolverFn>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async resolver for `type_name.field`.
    pub fn register<F, Fut>(&mut self, type_name: &str, field: &str, resolver: F)
    where
        F: Fn(ResolverRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<Value>> + Send + 'static,
    {
        let resolver: ResolverFn =
            Arc::new(move |request| -> ResolverFuture { Box::pin(resolver(request)) });
        self.entries
            .entry(type_name.to_string())
            .or_default()
            .insert(field.to_string(), resolver);
    }

    /// Register a resolver that always yields the same value. Useful for
    /// contract fixtures and tests.
    pub fn register_value(&mut self, type_name: &str, field: &str, value: Value) {
        self.register(type_name, field, move |_| {
            let value = value.clone();
            async move { Ok(value) }
        });
    }

    pub fn get(&self, type_name: &str, field: &str) -> Option<ResolverFn> {
        self.entries
            .get(type_name)
            .and_then(|fields| fields.get(field))
            .cloned()
    }

    pub fn contains(&self, type_name: &str, field: &str) -> bool {
        self.entries
            .get(type_name)
            .map(|fields| fields.contains_key(field))
            .unwrap_or(false)
    }

    /// All registered (type, field) keys, for validation against the
    /// compiled schema's field set.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(type_name, fields)| {
            fields.keys().map(move |field| (type_name.as_str(), field.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self
            .keys()
            .map(|(t, field)| format!("{}.{}", t, field))
            .collect();
        keys.sort();
        f.debug_struct("ResolverRegistry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ResolverRequest {
        ResolverRequest {
            parent: None,
            args: IndexMap::new(),
        }
    }

    #[tokio::test]
    async fn registered_resolver_is_invoked() {
        let mut registry = ResolverRegistry::new();
        registry.register_value("Query", "hello", Value::from("Hello world"));

        let resolver = registry.get("Query", "hello").expect("registered");
        let value = resolver(request()).await.expect("resolves");
        assert_eq!(value, Value::from("Hello world"));
    }

    #[tokio::test]
    async fn resolver_reads_arguments() {
        let mut registry = ResolverRegistry::new();
        registry.register("Query", "greeting", |request: ResolverRequest| async move {
            let name = request.string_arg("name").unwrap_or("stranger").to_string();
            Ok(Value::from(format!("Hello {}", name)))
        });

        let mut args = IndexMap::new();
        args.insert(Name::new("name"), Value::from("Ada"));
        let resolver = registry.get("Query", "greeting").expect("registered");
        let value = resolver(ResolverRequest { parent: None, args })
            .await
            .expect("resolves");
        assert_eq!(value, Value::from("Hello Ada"));
    }

    #[test]
    fn keys_reports_every_registration() {
        let mut registry = ResolverRegistry::new();
        registry.register_value("Query", "hello", Value::from("hi"));
        registry.register_value("User", "username", Value::from("ada"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("User", "username"));
        assert!(!registry.contains("User", "email"));

        let mut keys: Vec<(String, String)> = registry
            .keys()
            .map(|(t, f)| (t.to_string(), f.to_string()))
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ("Query".to_string(), "hello".to_string()),
                ("User".to_string(), "username".to_string()),
            ]
        );
    }
}
