//! GraphQL HTTP and WebSocket handlers
//!
//! The bearer token is resolved to a principal before the operation runs.
//! A missing or invalid token leaves the request unauthenticated instead of
//! rejecting it.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::response::IntoResponse;

use crate::AppState;
use crate::graphql::principal_data;

/// Authorization header value, if present and readable
fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// GraphQL query/mutation handler with auth context
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    request.data = principal_data(state.catalog.credentials(), authorization(&headers));

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
pub async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/graphql/ws")
                .finish(),
        )
        .into_response()
    } else {
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

/// GraphQL WebSocket handler for subscriptions with auth
pub async fn graphql_ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let header_data = principal_data(state.catalog.credentials(), authorization(&headers));

    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            let credentials = state.catalog.credentials().clone();

            GraphQLWebSocket::new(socket, state.schema.clone(), protocol)
                .with_data(header_data)
                // Token in connection_init payload takes over for browsers
                // that cannot set headers on a WebSocket
                .on_connection_init(move |params| async move {
                    let authorization = params
                        .get("Authorization")
                        .or_else(|| params.get("authorization"))
                        .and_then(|v| v.as_str());
                    Ok(principal_data(&credentials, authorization))
                })
                .serve()
        })
}
