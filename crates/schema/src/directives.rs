use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::parser::types::DirectiveLocation;
use async_graphql::{Name, Value, indexmap::IndexMap};

use app_error::{AppError, AppResult};

use crate::catalog::{BUILTIN_DIRECTIVES, TypeCatalog};

/// A build-time schema directive: fields annotated with it in the schema
/// document get their resolved value passed through `transform`.
///
/// The transformation sees the full field value, so a directive decides
/// for itself how to treat lists and nulls. Object-valued mock fields are
/// materialized lazily by the engine and skip transformation.
pub trait SchemaDirective: Send + Sync {
    /// The directive name as declared in the schema document, without `@`.
    fn name(&self) -> &str;

    fn transform(&self, value: Value, arguments: &IndexMap<Name, Value>) -> AppResult<Value>;
}

/// The directive mapping: directive name to implementation. Populated once
/// before assembly, immutable afterwards.
#[derive(Default, Clone)]
pub struct DirectiveRegistry {
    entries: HashMap<String, Arc<dyn SchemaDirective>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, directive: Arc<dyn SchemaDirective>) {
        self.entries.insert(directive.name().to_string(), directive);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SchemaDirective>> {
        self.entries.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every registered directive must be declared by the schema document
    /// for field definitions. A registration the document never declares,
    /// or declares for another location, is a construction-time conflict.
    pub fn validate(&self, catalog: &TypeCatalog) -> AppResult<()> {
        for name in self.names() {
            if BUILTIN_DIRECTIVES.contains(&name) {
                return Err(AppError::DirectiveConflict(format!(
                    "Directive '@{}' is built in and cannot be overridden",
                    name
                )));
            }
            let Some(declaration) = catalog.directive(name) else {
                return Err(AppError::directive_unknown(name));
            };
            if !declaration
                .locations
                .contains(&DirectiveLocation::FieldDefinition)
            {
                return Err(AppError::directive_bad_location(name));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort();
        f.debug_struct("DirectiveRegistry").field("names", &names).finish()
    }
}
