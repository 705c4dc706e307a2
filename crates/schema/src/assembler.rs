use std::sync::Arc;

use async_graphql::dynamic::{
    Enum, Field, FieldFuture, FieldValue, InputObject, InputValue, Interface, InterfaceField,
    Object, Scalar, Schema, TypeRef, Union,
};
use async_graphql::parser::types::{BaseType, FieldDefinition, InputValueDefinition, Type};
use async_graphql::{Name, Request, Response, Value, indexmap::IndexMap};
use tracing::{info, warn};

use app_config::MockOptions;
use app_error::{AppError, AppResult};

use crate::catalog::{BUILTIN_DIRECTIVES, ObjectDef, TypeCatalog};
use crate::directives::{DirectiveRegistry, SchemaDirective};
use crate::mocks::{MockGenerator, MockParent, MockSession, MockValue};
use crate::registry::{ResolverRegistry, ResolverRequest};

/// A directive application found on a schema field, bound to its
/// registered implementation and the constant arguments from the document.
struct AppliedDirective {
    directive: Arc<dyn SchemaDirective>,
    args: IndexMap<Name, Value>,
}

/// Combines a schema document, a resolver mapping and a directive mapping
/// into an executable schema. Construction happens exactly once per
/// process; the resulting [`GatewaySchema`] is immutable and shared.
pub struct GatewayAssembler {
    sdl: String,
    resolvers: ResolverRegistry,
    directives: DirectiveRegistry,
    options: MockOptions,
}

impl GatewayAssembler {
    pub fn new(sdl: impl Into<String>) -> Self {
        Self {
            sdl: sdl.into(),
            resolvers: ResolverRegistry::new(),
            directives: DirectiveRegistry::new(),
            options: MockOptions::default(),
        }
    }

    pub fn resolvers(mut self, resolvers: ResolverRegistry) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn directives(mut self, directives: DirectiveRegistry) -> Self {
        self.directives = directives;
        self
    }

    pub fn options(mut self, options: MockOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the executable schema. Schema and directive problems are
    /// fatal here; resolver keys with no matching schema field are logged
    /// and ignored, leaving those fields on the mock fallback.
    pub fn build(self) -> AppResult<GatewaySchema> {
        self.options.validate()?;

        let catalog = TypeCatalog::parse(&self.sdl)?;
        self.directives.validate(&catalog)?;

        for (type_name, field) in self.resolvers.keys() {
            if !catalog.has_field(type_name, field) {
                let mismatch = AppError::resolver_mismatch(type_name, field);
                warn!(error = %mismatch, "Ignoring resolver with no matching schema field");
            }
        }

        if let Some(subscription) = &catalog.subscription_type {
            warn!(
                root = %subscription,
                "Schema declares a subscription root; subscriptions are not served and the type is skipped"
            );
        }

        let index = Arc::new(catalog.index());
        let mocks = Arc::new(MockGenerator::new(self.options.clone(), index));

        let mut builder = Schema::build(
            &catalog.query_type,
            catalog.mutation_type.as_deref(),
            None::<&str>,
        )
        // Fallback RNG stream for callers that drive the executable schema
        // directly; the gateway wrapper attaches a fresh one per request
        .data(MockSession::for_options(&self.options));

        for scalar in &catalog.scalars {
            let mut dynamic_scalar = Scalar::new(scalar.name.clone());
            if let Some(description) = &scalar.description {
                dynamic_scalar = dynamic_scalar.description(description.clone());
            }
            builder = builder.register(dynamic_scalar);
        }

        for enum_def in &catalog.enums {
            let mut dynamic_enum = Enum::new(enum_def.name.clone());
            if let Some(description) = &enum_def.description {
                dynamic_enum = dynamic_enum.description(description.clone());
            }
            for value in &enum_def.values {
                dynamic_enum = dynamic_enum.item(value.as_str());
            }
            builder = builder.register(dynamic_enum);
        }

        for input in &catalog.inputs {
            let mut dynamic_input = InputObject::new(input.name.clone());
            if let Some(description) = &input.description {
                dynamic_input = dynamic_input.description(description.clone());
            }
            for field in &input.fields {
                dynamic_input = dynamic_input.field(input_value(field));
            }
            builder = builder.register(dynamic_input);
        }

        for interface in &catalog.interfaces {
            let mut dynamic_interface = Interface::new(interface.name.clone());
            if let Some(description) = &interface.description {
                dynamic_interface = dynamic_interface.description(description.clone());
            }
            for field in &interface.fields {
                let mut interface_field =
                    InterfaceField::new(field.name.node.to_string(), type_ref(&field.ty.node));
                for argument in &field.arguments {
                    interface_field = interface_field.argument(input_value(&argument.node));
                }
                dynamic_interface = dynamic_interface.field(interface_field);
            }
            builder = builder.register(dynamic_interface);
        }

        for union_def in &catalog.unions {
            let mut dynamic_union = Union::new(union_def.name.clone());
            if let Some(description) = &union_def.description {
                dynamic_union = dynamic_union.description(description.clone());
            }
            for member in &union_def.members {
                dynamic_union = dynamic_union.possible_type(member.clone());
            }
            builder = builder.register(dynamic_union);
        }

        for object in &catalog.objects {
            // The subscription root is not served
            if Some(&object.name) == catalog.subscription_type.as_ref() {
                continue;
            }
            builder = builder.register(self.build_object(object, &mocks));
        }

        let schema = builder
            .finish()
            .map_err(|e| AppError::schema_build_failed(e))?;

        info!(
            query_root = %catalog.query_type,
            resolvers = self.resolvers.len(),
            directives = self.directives.len(),
            mocks_enabled = self.options.enabled,
            mock_entire_schema = self.options.mock_entire_schema,
            "Gateway schema assembled"
        );

        Ok(GatewaySchema {
            schema,
            sdl: self.sdl,
            options: self.options,
        })
    }

    fn build_object(&self, object: &ObjectDef, mocks: &Arc<MockGenerator>) -> Object {
        let mut dynamic_object = Object::new(object.name.clone());
        if let Some(description) = &object.description {
            dynamic_object = dynamic_object.description(description.clone());
        }
        for interface in &object.implements {
            dynamic_object = dynamic_object.implement(interface.clone());
        }
        for field in &object.fields {
            dynamic_object = dynamic_object.field(self.build_field(&object.name, field, mocks));
        }
        dynamic_object
    }

    fn build_field(
        &self,
        type_name: &str,
        field: &FieldDefinition,
        mocks: &Arc<MockGenerator>,
    ) -> Field {
        let field_name = field.name.node.to_string();

        // The mocking policy is decided once, at build time: with
        // mock_entire_schema set, a registered resolver is never consulted
        let registered = self.resolvers.get(type_name, &field_name);
        let resolver = if self.options.overrides_resolvers() {
            None
        } else {
            registered
        };

        let applied = Arc::new(self.applied_directives(type_name, field));
        let field_type = field.ty.node.clone();
        let mocks = Arc::clone(mocks);
        let mocks_enabled = self.options.enabled;

        let mut dynamic_field = Field::new(
            field_name,
            type_ref(&field_type),
            move |ctx| {
                let resolver = resolver.clone();
                let applied = Arc::clone(&applied);
                let mocks = Arc::clone(&mocks);
                let field_type = field_type.clone();
                FieldFuture::new(async move {
                    match resolver {
                        Some(resolver) => {
                            let parent = ctx.parent_value.as_value().cloned();
                            let args = ctx.args.as_index_map().clone();
                            let value = resolver(ResolverRequest { parent, args })
                                .await
                                .map_err(|e| e.to_field_error())?;
                            let value = apply_directives(&applied, value)?;
                            if value == Value::Null {
                                Ok(None)
                            } else {
                                Ok(Some(FieldValue::value(value)))
                            }
                        }
                        None => {
                            if !mocks_enabled {
                                // Unresolved and unmocked: null; the engine
                                // reports non-null violations itself
                                return Ok(None);
                            }
                            let session = ctx.ctx.data::<MockSession>()?;
                            let mock = mocks
                                .for_type(&field_type, session)
                                .map_err(|e| e.to_field_error())?;
                            into_field_value(mock, &applied)
                        }
                    }
                })
            },
        );

        if let Some(description) = &field.description {
            dynamic_field = dynamic_field.description(description.node.clone());
        }
        for argument in &field.arguments {
            dynamic_field = dynamic_field.argument(input_value(&argument.node));
        }
        dynamic_field
    }

    /// Field-definition directives present in both the document and the
    /// registry, in declaration order. Built-ins belong to the engine; an
    /// applied directive nobody registered leaves the field untransformed.
    fn applied_directives(&self, type_name: &str, field: &FieldDefinition) -> Vec<AppliedDirective> {
        let mut applied = Vec::new();
        for directive in &field.directives {
            let name = directive.node.name.node.as_str();
            if BUILTIN_DIRECTIVES.contains(&name) {
                continue;
            }
            match self.directives.get(name) {
                Some(implementation) => {
                    let args = directive
                        .node
                        .arguments
                        .iter()
                        .map(|(arg_name, value)| (arg_name.node.clone(), value.node.clone()))
                        .collect();
                    applied.push(AppliedDirective {
                        directive: implementation,
                        args,
                    });
                }
                None => warn!(
                    directive = name,
                    field = %format!("{}.{}", type_name, field.name.node),
                    "Schema applies a directive with no registered implementation"
                ),
            }
        }
        applied
    }
}

/// The request handler: built once, stateless across invocations. Cheap to
/// clone and share with the HTTP layer.
#[derive(Clone)]
pub struct GatewaySchema {
    schema: Schema,
    sdl: String,
    options: MockOptions,
}

impl GatewaySchema {
    /// Execute one request. Failures surface as GraphQL errors in the
    /// response envelope, never as a transport error.
    ///
    /// Each request gets its own RNG stream, so a fixed seed makes
    /// identical requests produce identical responses.
    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        let session = MockSession::for_options(&self.options);
        self.schema.execute(request.into().data(session)).await
    }

    /// The schema document this gateway was assembled from.
    pub fn sdl(&self) -> &str {
        &self.sdl
    }
}

impl std::fmt::Debug for GatewaySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySchema")
            .field("sdl_bytes", &self.sdl.len())
            .finish()
    }
}

fn type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::Named(name.to_string().into()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

fn input_value(definition: &InputValueDefinition) -> InputValue {
    let mut value = InputValue::new(definition.name.node.to_string(), type_ref(&definition.ty.node));
    if let Some(description) = &definition.description {
        value = value.description(description.node.clone());
    }
    if let Some(default) = &definition.default_value {
        value = value.default_value(default.node.clone());
    }
    value
}

fn apply_directives(
    applied: &[AppliedDirective],
    mut value: Value,
) -> async_graphql::Result<Value> {
    for entry in applied {
        value = entry
            .directive
            .transform(value, &entry.args)
            .map_err(|e| e.to_field_error())?;
    }
    Ok(value)
}

/// Mocked leaves (and lists of leaves) become concrete values so field
/// directives can transform them; mocked objects stay lazy and descend
/// through their own field mocks.
fn into_field_value(
    mock: MockValue,
    applied: &[AppliedDirective],
) -> async_graphql::Result<Option<FieldValue<'static>>> {
    match flatten_leaves(&mock) {
        Some(value) => {
            let value = apply_directives(applied, value)?;
            if value == Value::Null {
                Ok(None)
            } else {
                Ok(Some(FieldValue::value(value)))
            }
        }
        None => Ok(Some(build_field_value(mock))),
    }
}

fn flatten_leaves(mock: &MockValue) -> Option<Value> {
    match mock {
        MockValue::Leaf(value) => Some(value.clone()),
        MockValue::List(items) => items
            .iter()
            .map(flatten_leaves)
            .collect::<Option<Vec<_>>>()
            .map(Value::List),
        MockValue::Object(_) => None,
    }
}

fn build_field_value(mock: MockValue) -> FieldValue<'static> {
    match mock {
        MockValue::Leaf(value) => FieldValue::value(value),
        MockValue::Object(type_name) => FieldValue::owned_any(MockParent {
            type_name: type_name.clone(),
        })
        .with_type(type_name),
        MockValue::List(items) => FieldValue::list(items.into_iter().map(build_field_value)),
    }
}
