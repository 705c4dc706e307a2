use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    response::{Html, IntoResponse},
};
use std::sync::Arc;

use crate::service::{GatewayService, GatewayServiceTrait};

// Handler for GraphQL POST requests. Every outcome is a well-formed
// GraphQL envelope with transport-level success; execution failures ride
// in the response's error list.
pub async fn graphql_handler(
    service: Extension<Arc<GatewayService>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let response = service.execute(req.into_inner()).await;
    response.into()
}

// Handler for GraphQL playground UI
pub async fn graphql_playground() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

// Simple health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (
        axum::http::StatusCode::OK,
        Html(
            "<html>
                <head>
                    <title>Gateway Health Check</title>
                    <style>
                        body {
                            font-family: Arial, sans-serif;
                            background-color: #f4f4f9;
                            color: #333;
                            text-align: center;
                            padding: 50px;
                        }
                        h1 {
                            color: green;
                        }
                        p {
                            font-size: 18px;
                        }
                    </style>
                </head>
                <body>
                    <h1>Gateway Health Check</h1>
                    <p>Status: <strong>OK</strong></p>
                    <p>The mock gateway is up and serving synthetic data.</p>
                </body>
            </html>",
        ),
    )
}
