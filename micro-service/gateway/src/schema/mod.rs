use app_config::{AppConfig, MockOptions};
use app_error::AppResult;
use app_schema::{GatewayAssembler, GatewaySchema};

use crate::{directives, resolvers};

/// The schema document served when the configuration names no override.
pub const DEFAULT_TYPE_DEFS: &str = include_str!("../type_defs.graphql");

/// Assemble the gateway schema once at startup: schema document, resolver
/// mapping and directive mapping combined under the configured mocking
/// policy. Construction failures are fatal; callers must not serve.
pub fn create_schema(config: &AppConfig) -> AppResult<GatewaySchema> {
    let sdl = config
        .schema_document()?
        .unwrap_or_else(|| DEFAULT_TYPE_DEFS.to_string());

    GatewayAssembler::new(sdl)
        .resolvers(resolvers::create_resolvers())
        .directives(directives::create_directives())
        .options(MockOptions::from(config))
        .build()
}
