use async_graphql::{Request, Response};
use async_trait::async_trait;

use app_schema::GatewaySchema;

/// Trait defining the gateway service interface
#[async_trait]
pub trait GatewayServiceTrait: Send + Sync {
    /// Execute one GraphQL request against the assembled schema
    async fn execute(&self, request: Request) -> Response;

    /// The schema document the gateway serves
    fn sdl(&self) -> &str;
}

/// Production implementation backed by the assembled schema. Holds no
/// per-request state; one instance is shared across all invocations.
pub struct GatewayService {
    schema: GatewaySchema,
}

impl GatewayService {
    pub fn new(schema: GatewaySchema) -> Self {
        Self { schema }
    }
}

#[async_trait]
impl GatewayServiceTrait for GatewayService {
    async fn execute(&self, request: Request) -> Response {
        self.schema.execute(request).await
    }

    fn sdl(&self) -> &str {
        self.schema.sdl()
    }
}
