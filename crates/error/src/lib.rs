pub mod middleware_handling;

mod macros;

use async_graphql::{Error as GraphQLError, ErrorExtensions, FieldError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    ConfigError(anyhow::Error),
    SchemaError(String),
    DirectiveConflict(String),
    ResolverMismatch { type_name: String, field: String },
    GraphQLError(GraphQLError),
    ServerError(anyhow::Error),
    ValidationError(String),
    NotFoundError(String),
    MockError(String),
    InputError(String),
}

impl AppError {
    // Schema construction errors are fatal: the process must not serve
    pub fn schema_parse_failed(detail: impl fmt::Display) -> Self {
        Self::SchemaError(format!("Schema document failed to parse: {}", detail))
    }

    pub fn schema_build_failed(detail: impl fmt::Display) -> Self {
        Self::SchemaError(format!("Schema registration failed: {}", detail))
    }

    pub fn missing_root_type(name: &str) -> Self {
        Self::SchemaError(format!(
            "Schema names '{}' as a root operation type but never defines it",
            name
        ))
    }

    pub fn directive_unknown(name: &str) -> Self {
        Self::DirectiveConflict(format!(
            "Directive '@{}' is registered but never declared by the schema document",
            name
        ))
    }

    pub fn directive_bad_location(name: &str) -> Self {
        Self::DirectiveConflict(format!(
            "Directive '@{}' is not declared for field definitions",
            name
        ))
    }

    // Non-fatal: the field falls back to a mock value
    pub fn resolver_mismatch(type_name: &str, field: &str) -> Self {
        Self::ResolverMismatch {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }

    pub fn resource_not_found(resource_type: &str, identifier: &str) -> Self {
        Self::NotFoundError(format!(
            "{} with identifier '{}' was not found.",
            resource_type, identifier
        ))
    }

    // Validation errors
    pub fn validation(field: &str, message: &str) -> Self {
        Self::ValidationError(format!("Validation failed for '{}': {}", field, message))
    }

    pub fn mock_generation_failed(type_name: &str, detail: &str) -> Self {
        Self::MockError(format!(
            "Mock value generation failed for type '{}': {}",
            type_name, detail
        ))
    }
}

impl std::error::Error for AppError {}

// Convert from various error types to AppError
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::ServerError(error)
    }
}

impl From<GraphQLError> for AppError {
    fn from(error: GraphQLError) -> Self {
        Self::GraphQLError(error)
    }
}

// Human-friendly error messages
impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Self::SchemaError(msg) => write!(f, "Schema error: {}", msg),
            Self::DirectiveConflict(msg) => write!(f, "Directive conflict: {}", msg),
            Self::ResolverMismatch { type_name, field } => write!(
                f,
                "Resolver registered for '{}.{}' does not match any schema field",
                type_name, field
            ),
            Self::GraphQLError(e) => write!(f, "GraphQL error: {:?}", e),
            Self::ServerError(e) => write!(f, "Server error: {}", e),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::NotFoundError(msg) => write!(f, "Not found: {}", msg),
            Self::MockError(msg) => write!(f, "Mock error: {}", msg),
            Self::InputError(msg) => write!(f, "Input error: {}", msg),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, error_code, help_text) = match &self {
            Self::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "System configuration error",
                "CONFIG_ERROR",
                None,
            ),
            Self::SchemaError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Schema construction failed",
                "SCHEMA_ERROR",
                None,
            ),
            Self::DirectiveConflict(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Directive wiring conflict",
                "DIRECTIVE_CONFLICT",
                None,
            ),
            Self::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                msg.as_str(),
                "VALIDATION_ERROR",
                Some("Please review your input and try again."),
            ),
            Self::InputError(msg) => (
                StatusCode::BAD_REQUEST,
                msg.as_str(),
                "INPUT_ERROR",
                Some("Please review your request payload and try again."),
            ),
            Self::NotFoundError(msg) => (
                StatusCode::NOT_FOUND,
                msg.as_str(),
                "NOT_FOUND",
                Some("The requested resource was not found."),
            ),
            // Handle other error types...
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "SERVER_ERROR",
                None,
            ),
        };

        // Log the error with context
        let log_message = format!("[{}] {}: {}", error_code, status, self);
        if status.is_server_error() {
            tracing::error!(error_code = error_code, status_code = %status.as_u16(), %error_message, "{}", log_message);
        } else {
            tracing::warn!(error_code = error_code, status_code = %status.as_u16(), %error_message, "{}", log_message);
        }

        // Return a clean response to the client
        let body = Json(ErrorResponse {
            status: status.to_string(),
            message: error_message.to_string(),
            code: error_code.to_string(),
            details: if status == StatusCode::INTERNAL_SERVER_ERROR {
                None // Don't expose internal error details to clients
            } else {
                Some(self.to_string())
            },
            help: help_text.map(String::from),
        });

        (status, body).into_response()
    }
}

// Utility for anyhow results to AppError conversions
pub type AppResult<T> = Result<T, AppError>;

// Extension trait to wrap foreign errors with specific context
pub trait AppErrorExt<T> {
    fn config_err(self) -> AppResult<T>;
    fn schema_err(self) -> AppResult<T>;
    fn server_err(self) -> AppResult<T>;
}

impl<T, E> AppErrorExt<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn config_err(self) -> AppResult<T> {
        self.map_err(|e| AppError::ConfigError(anyhow::anyhow!("{}", e)))
    }

    fn schema_err(self) -> AppResult<T> {
        self.map_err(|e| AppError::SchemaError(e.to_string()))
    }

    fn server_err(self) -> AppResult<T> {
        self.map_err(|e| AppError::ServerError(anyhow::anyhow!("{}", e)))
    }
}

impl AppError {
    // Convert AppError to a GraphQL FieldError with appropriate extensions
    pub fn to_field_error(&self) -> FieldError {
        let mut error = FieldError::new(self.to_string());

        // Add appropriate extensions based on error type
        match self {
            Self::ValidationError(msg) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "VALIDATION_ERROR");
                    e.set("details", msg);
                });
            }
            Self::InputError(msg) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "INPUT_ERROR");
                    e.set("details", msg);
                });
            }
            Self::NotFoundError(msg) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "NOT_FOUND_ERROR");
                    e.set("details", msg);
                });
            }
            Self::MockError(msg) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "MOCK_ERROR");
                    e.set("details", msg);
                });
            }
            Self::SchemaError(_) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "SCHEMA_ERROR");
                    e.set("details", "The schema failed to build");
                });
            }
            Self::DirectiveConflict(_) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "DIRECTIVE_CONFLICT");
                    e.set("details", "Directive wiring does not match the schema");
                });
            }
            Self::ResolverMismatch { type_name, field } => {
                error = error.extend_with(|_, e| {
                    e.set("code", "RESOLVER_MISMATCH");
                    e.set("details", format!("{}.{}", type_name, field));
                });
            }
            Self::ConfigError(_) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "CONFIG_ERROR");
                    e.set("details", "A configuration error occurred");
                });
            }
            Self::ServerError(_) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "SERVER_ERROR");
                    e.set("details", "An internal server error occurred");
                });
            }
            Self::GraphQLError(err) => {
                error = error.extend_with(|_, e| {
                    e.set("code", "GRAPHQL_ERROR");
                    e.set("details", format!("{:?}", err));
                });
            }
        };

        // Log the error with appropriate level based on error type
        match self {
            Self::ServerError(_) | Self::ConfigError(_) => {
                tracing::error!(error = %self, "GraphQL resolver error");
            }
            Self::SchemaError(_) | Self::DirectiveConflict(_) => {
                tracing::error!(error = %self, "Schema construction error");
            }
            Self::ValidationError(_) | Self::NotFoundError(_) | Self::InputError(_) => {
                tracing::info!(error = %self, "Client request error");
            }
            _ => {
                tracing::warn!(error = %self, "GraphQL error");
            }
        }

        error
    }
}
