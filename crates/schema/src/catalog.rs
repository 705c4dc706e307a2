use std::collections::{HashMap, HashSet};

use async_graphql::parser::parse_schema;
use async_graphql::parser::types::{
    DirectiveLocation, FieldDefinition, InputValueDefinition, TypeKind, TypeSystemDefinition,
};

use app_error::{AppError, AppResult};

/// Scalar names GraphQL itself defines; everything else named by the
/// document is a custom scalar and must be registered explicitly.
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Directives the engine itself understands; they never need an entry in
/// the directive mapping.
pub const BUILTIN_DIRECTIVES: [&str; 5] =
    ["include", "skip", "deprecated", "specifiedBy", "oneOf"];

#[derive(Debug, Clone)]
pub struct ObjectDef {
    pub name: String,
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone)]
pub struct InterfaceDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone)]
pub struct UnionDef {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScalarDef {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InputDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValueDefinition>,
}

#[derive(Debug, Clone)]
pub struct DirectiveDef {
    pub name: String,
    pub locations: Vec<DirectiveLocation>,
}

/// The shape of a schema document after one pass over its AST: root
/// operation names plus every named type, split by kind.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub objects: Vec<ObjectDef>,
    pub interfaces: Vec<InterfaceDef>,
    pub unions: Vec<UnionDef>,
    pub enums: Vec<EnumDef>,
    pub scalars: Vec<ScalarDef>,
    pub inputs: Vec<InputDef>,
    pub directives: Vec<DirectiveDef>,
}

/// Kind of a named type, as needed by mock generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKindInfo {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
}

/// Immutable name-to-shape summary shared with the per-field resolver
/// closures. Derived from a [`TypeCatalog`] once, then never mutated.
#[derive(Debug, Default)]
pub struct TypeIndex {
    kinds: HashMap<String, TypeKindInfo>,
    enum_values: HashMap<String, Vec<String>>,
    union_members: HashMap<String, Vec<String>>,
    interface_implementors: HashMap<String, Vec<String>>,
}

impl TypeIndex {
    pub fn kind(&self, name: &str) -> Option<TypeKindInfo> {
        self.kinds.get(name).copied()
    }

    pub fn enum_values(&self, name: &str) -> Option<&[String]> {
        self.enum_values.get(name).map(Vec::as_slice)
    }

    pub fn union_members(&self, name: &str) -> Option<&[String]> {
        self.union_members.get(name).map(Vec::as_slice)
    }

    pub fn interface_implementors(&self, name: &str) -> Option<&[String]> {
        self.interface_implementors.get(name).map(Vec::as_slice)
    }
}

impl TypeCatalog {
    /// Parse an SDL document into a catalog. Any malformed document is a
    /// construction-time failure; the caller must not serve.
    pub fn parse(sdl: &str) -> AppResult<Self> {
        let document = parse_schema(sdl).map_err(AppError::schema_parse_failed)?;

        let mut seen = HashSet::new();
        let mut explicit_query = None;
        let mut explicit_mutation = None;
        let mut explicit_subscription = None;
        let mut saw_schema_definition = false;

        let mut objects = Vec::new();
        let mut interfaces = Vec::new();
        let mut unions = Vec::new();
        let mut enums = Vec::new();
        let mut scalars = Vec::new();
        let mut inputs = Vec::new();
        let mut directives = Vec::new();

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema_def) => {
                    let schema_def = schema_def.node;
                    if schema_def.extend {
                        return Err(AppError::SchemaError(
                            "Schema extensions are not supported".to_string(),
                        ));
                    }
                    if saw_schema_definition {
                        return Err(AppError::SchemaError(
                            "Schema document contains more than one schema definition"
                                .to_string(),
                        ));
                    }
                    saw_schema_definition = true;
                    explicit_query = schema_def.query.map(|n| n.node.to_string());
                    explicit_mutation = schema_def.mutation.map(|n| n.node.to_string());
                    explicit_subscription = schema_def.subscription.map(|n| n.node.to_string());
                }
                TypeSystemDefinition::Type(type_def) => {
                    let type_def = type_def.node;
                    let name = type_def.name.node.to_string();
                    if type_def.extend {
                        return Err(AppError::SchemaError(format!(
                            "Type extensions are not supported (extend type '{}')",
                            name
                        )));
                    }
                    if !seen.insert(name.clone()) {
                        return Err(AppError::SchemaError(format!(
                            "Type '{}' is defined more than once",
                            name
                        )));
                    }
                    let description = type_def.description.map(|d| d.node);

                    match type_def.kind {
                        TypeKind::Scalar => scalars.push(ScalarDef { name, description }),
                        TypeKind::Object(object) => objects.push(ObjectDef {
                            name,
                            description,
                            implements: object
                                .implements
                                .iter()
                                .map(|i| i.node.to_string())
                                .collect(),
                            fields: object.fields.into_iter().map(|f| f.node).collect(),
                        }),
                        TypeKind::Interface(interface) => interfaces.push(InterfaceDef {
                            name,
                            description,
                            fields: interface.fields.into_iter().map(|f| f.node).collect(),
                        }),
                        TypeKind::Union(union_type) => unions.push(UnionDef {
                            name,
                            description,
                            members: union_type
                                .members
                                .iter()
                                .map(|m| m.node.to_string())
                                .collect(),
                        }),
                        TypeKind::Enum(enum_type) => enums.push(EnumDef {
                            name,
                            description,
                            values: enum_type
                                .values
                                .iter()
                                .map(|v| v.node.value.node.to_string())
                                .collect(),
                        }),
                        TypeKind::InputObject(input) => inputs.push(InputDef {
                            name,
                            description,
                            fields: input.fields.into_iter().map(|f| f.node).collect(),
                        }),
                    }
                }
                TypeSystemDefinition::Directive(directive_def) => {
                    let directive_def = directive_def.node;
                    directives.push(DirectiveDef {
                        name: directive_def.name.node.to_string(),
                        locations: directive_def
                            .locations
                            .iter()
                            .map(|l| l.node)
                            .collect(),
                    });
                }
            }
        }

        let object_names: HashSet<&str> = objects.iter().map(|o| o.name.as_str()).collect();

        // The query root is mandatory; mutation and subscription are not
        let query_type = explicit_query.unwrap_or_else(|| "Query".to_string());
        if !object_names.contains(query_type.as_str()) {
            return Err(AppError::missing_root_type(&query_type));
        }

        let mutation_type = match explicit_mutation {
            Some(name) => {
                if !object_names.contains(name.as_str()) {
                    return Err(AppError::missing_root_type(&name));
                }
                Some(name)
            }
            None => object_names.contains("Mutation").then(|| "Mutation".to_string()),
        };

        let subscription_type = match explicit_subscription {
            Some(name) => {
                if !object_names.contains(name.as_str()) {
                    return Err(AppError::missing_root_type(&name));
                }
                Some(name)
            }
            None => object_names
                .contains("Subscription")
                .then(|| "Subscription".to_string()),
        };

        Ok(Self {
            query_type,
            mutation_type,
            subscription_type,
            objects,
            interfaces,
            unions,
            enums,
            scalars,
            inputs,
            directives,
        })
    }

    /// Whether an object type declares the given field.
    pub fn has_field(&self, type_name: &str, field: &str) -> bool {
        self.objects
            .iter()
            .find(|o| o.name == type_name)
            .map(|o| o.fields.iter().any(|f| f.name.node.as_str() == field))
            .unwrap_or(false)
    }

    /// The declaration for a directive name, if the document carries one.
    pub fn directive(&self, name: &str) -> Option<&DirectiveDef> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Build the immutable lookup structure shared with resolver closures.
    pub fn index(&self) -> TypeIndex {
        let mut kinds = HashMap::new();
        let mut enum_values = HashMap::new();
        let mut union_members = HashMap::new();
        let mut interface_implementors: HashMap<String, Vec<String>> = HashMap::new();

        for object in &self.objects {
            kinds.insert(object.name.clone(), TypeKindInfo::Object);
            for interface in &object.implements {
                interface_implementors
                    .entry(interface.clone())
                    .or_default()
                    .push(object.name.clone());
            }
        }
        for interface in &self.interfaces {
            kinds.insert(interface.name.clone(), TypeKindInfo::Interface);
            interface_implementors.entry(interface.name.clone()).or_default();
        }
        for union_def in &self.unions {
            kinds.insert(union_def.name.clone(), TypeKindInfo::Union);
            union_members.insert(union_def.name.clone(), union_def.members.clone());
        }
        for enum_def in &self.enums {
            kinds.insert(enum_def.name.clone(), TypeKindInfo::Enum);
            enum_values.insert(enum_def.name.clone(), enum_def.values.clone());
        }
        for scalar in &self.scalars {
            kinds.insert(scalar.name.clone(), TypeKindInfo::Scalar);
        }
        for input in &self.inputs {
            kinds.insert(input.name.clone(), TypeKindInfo::InputObject);
        }

        TypeIndex {
            kinds,
            enum_values,
            union_members,
            interface_implementors,
        }
    }
}
