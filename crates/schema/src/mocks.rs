use std::sync::{Arc, Mutex, MutexGuard};

use async_graphql::parser::types::{BaseType, Type};
use async_graphql::{Name, Value};
use rand::{Rng, SeedableRng, rngs::StdRng};

use app_config::MockOptions;
use app_error::{AppError, AppResult};

use crate::catalog::{TypeIndex, TypeKindInfo};

/// Sample vocabulary for mocked String fields.
const WORDS: [&str; 16] = [
    "amber", "breeze", "cobalt", "drift", "ember", "fathom", "glade", "harbor", "indigo",
    "juniper", "kestrel", "lumen", "meadow", "nimbus", "orchid", "prairie",
];

// 2020-01-01T00:00:00Z, the base for mocked temporal scalars
const MOCK_EPOCH: i64 = 1_577_836_800;
const MOCK_EPOCH_SPAN: i64 = 10 * 365 * 24 * 60 * 60;

/// A synthesized value before it is handed to the engine. Leaves carry a
/// concrete GraphQL value; `Object` names a concrete object type whose
/// fields the engine will resolve lazily, each through its own mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Leaf(Value),
    Object(String),
    List(Vec<MockValue>),
}

/// Opaque parent handed to child resolvers below a mocked object field.
/// It carries no data: every child synthesizes its own value.
pub struct MockParent {
    pub type_name: String,
}

/// One request's RNG stream. A fresh session per request makes a fixed
/// seed replay the same response for the same query; the fallback session
/// registered on the schema is only reached when the executable schema is
/// driven directly, without the gateway wrapper.
pub struct MockSession {
    rng: Mutex<StdRng>,
}

impl MockSession {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn random() -> Self {
        Self::seeded(rand::rng().random())
    }

    pub fn for_options(options: &MockOptions) -> Self {
        match options.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::random(),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Type-directed mock value synthesis. The generator itself is stateless
/// policy plus the type index; all randomness comes from the
/// [`MockSession`] handed in per request. Without a fixed seed each
/// session starts from a random seed and scalar content varies between
/// calls, which callers must treat as expected.
pub struct MockGenerator {
    options: MockOptions,
    index: Arc<TypeIndex>,
}

impl MockGenerator {
    pub fn new(options: MockOptions, index: Arc<TypeIndex>) -> Self {
        Self { options, index }
    }

    /// Synthesize a value for a field's declared type. Non-null positions
    /// are satisfied by construction: generation never yields null.
    pub fn for_type(&self, ty: &Type, session: &MockSession) -> AppResult<MockValue> {
        self.for_base(&ty.base, session)
    }

    fn for_base(&self, base: &BaseType, session: &MockSession) -> AppResult<MockValue> {
        match base {
            BaseType::List(inner) => {
                let items = (0..self.options.list_length)
                    .map(|_| self.for_type(inner, session))
                    .collect::<AppResult<Vec<_>>>()?;
                Ok(MockValue::List(items))
            }
            BaseType::Named(name) => self.for_named(name.as_str(), session),
        }
    }

    fn for_named(&self, name: &str, session: &MockSession) -> AppResult<MockValue> {
        match name {
            "String" => Ok(MockValue::Leaf(Value::from(phrase(session)))),
            "Int" => Ok(MockValue::Leaf(Value::from(
                session.rng().random_range(0..=1000i64),
            ))),
            "Float" => Ok(MockValue::Leaf(Value::from(float(session)))),
            "Boolean" => Ok(MockValue::Leaf(Value::from(session.rng().random::<bool>()))),
            "ID" => Ok(MockValue::Leaf(Value::from(id(session)))),
            _ => match self.index.kind(name) {
                Some(TypeKindInfo::Enum) => self.enum_value(name, session),
                Some(TypeKindInfo::Object) => Ok(MockValue::Object(name.to_string())),
                Some(TypeKindInfo::Interface) => self.concrete(
                    name,
                    self.index.interface_implementors(name),
                    "interface has no implementing object type",
                    session,
                ),
                Some(TypeKindInfo::Union) => self.concrete(
                    name,
                    self.index.union_members(name),
                    "union has no member types",
                    session,
                ),
                Some(TypeKindInfo::Scalar) => Ok(MockValue::Leaf(custom_scalar(name, session))),
                Some(TypeKindInfo::InputObject) => Err(AppError::mock_generation_failed(
                    name,
                    "input object types cannot appear in output positions",
                )),
                None => Err(AppError::mock_generation_failed(
                    name,
                    "type is not defined by the schema document",
                )),
            },
        }
    }

    fn enum_value(&self, name: &str, session: &MockSession) -> AppResult<MockValue> {
        let values = self
            .index
            .enum_values(name)
            .filter(|values| !values.is_empty())
            .ok_or_else(|| AppError::mock_generation_failed(name, "enum declares no values"))?;
        let pick = session.rng().random_range(0..values.len());
        Ok(MockValue::Leaf(Value::Enum(Name::new(&values[pick]))))
    }

    fn concrete(
        &self,
        name: &str,
        candidates: Option<&[String]>,
        missing: &str,
        session: &MockSession,
    ) -> AppResult<MockValue> {
        let candidates = candidates
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::mock_generation_failed(name, missing))?;
        let pick = session.rng().random_range(0..candidates.len());
        Ok(MockValue::Object(candidates[pick].clone()))
    }
}

fn phrase(session: &MockSession) -> String {
    let mut rng = session.rng();
    let first = WORDS[rng.random_range(0..WORDS.len())];
    let second = WORDS[rng.random_range(0..WORDS.len())];
    let mut phrase = String::with_capacity(first.len() + second.len() + 1);
    phrase.push(first.chars().next().unwrap_or('m').to_ascii_uppercase());
    phrase.push_str(&first[1..]);
    phrase.push(' ');
    phrase.push_str(second);
    phrase
}

fn float(session: &MockSession) -> f64 {
    let raw: f64 = session.rng().random_range(0.0..100.0);
    (raw * 100.0).round() / 100.0
}

fn id(session: &MockSession) -> String {
    let bytes: [u8; 16] = session.rng().random();
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}

fn custom_scalar(name: &str, session: &MockSession) -> Value {
    let offset = session.rng().random_range(0..MOCK_EPOCH_SPAN);
    let instant = chrono::DateTime::from_timestamp(MOCK_EPOCH + offset, 0)
        .unwrap_or_else(chrono::Utc::now);
    match name {
        "DateTime" | "Timestamp" => Value::from(instant.to_rfc3339()),
        "Date" => Value::from(instant.date_naive().to_string()),
        "Time" => Value::from(instant.time().format("%H:%M:%S").to_string()),
        other => {
            // No declared shape to imitate; a labeled placeholder keeps
            // the payload recognizable in consumer fixtures
            let tag: u16 = session.rng().random();
            Value::from(format!("{}-{:04x}", other.to_ascii_lowercase(), tag))
        }
    }
}
