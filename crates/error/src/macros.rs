/// Provides a convenient way to add context to errors
///
/// # Example
/// ```ignore
/// with_context!(schema_build, "Failed to register schema types")
/// ```
#[macro_export]
macro_rules! with_context {
    ($result:expr, $context:expr) => {
        $result.map_err(|e| {
            tracing::error!("{}: {}", $context, e);
            $crate::AppError::ServerError(anyhow::anyhow!("{}: {}", $context, e))
        })
    };

    ($result:expr, $error_type:ident, $context:expr) => {
        $result.map_err(|e| {
            tracing::error!("{}: {}", $context, e);
            $crate::AppError::$error_type(format!("{}: {}", $context, e))
        })
    };
}

/// Simplifies creating validation errors
///
/// # Example
/// ```ignore
/// validation_error!("query", "Query text must not be empty")
/// ```
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        Err($crate::AppError::ValidationError(format!(
            "Validation failed for '{}': {}",
            $field, $message
        )))
    };
}

/// Simplifies creating schema construction errors
///
/// # Example
/// ```ignore
/// schema_error!("Union 'SearchResult' has no members")
/// ```
#[macro_export]
macro_rules! schema_error {
    ($($arg:tt)*) => {
        Err($crate::AppError::SchemaError(format!($($arg)*)))
    };
}

/// Simplifies creating directive conflict errors
///
/// # Example
/// ```ignore
/// directive_conflict!("Directive '@{}' declared twice", name)
/// ```
#[macro_export]
macro_rules! directive_conflict {
    ($($arg:tt)*) => {
        Err($crate::AppError::DirectiveConflict(format!($($arg)*)))
    };
}
