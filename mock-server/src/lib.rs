//! Echo server backing the client integration tests.
//!
//! # Design
//! Every route except `/test/error` reflects the incoming request back as
//! JSON: method, URL (path + query), header map, and the decoded JSON body
//! when one was sent. `/test/error` answers 500 with a JSON message. That is
//! enough surface to observe exactly what the client put on the wire.

use std::collections::HashMap;

use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the echo handler reflects back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoReply {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

pub fn app() -> Router {
    Router::new()
        .route("/test/error", any(server_error))
        .fallback(echo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(req: Request) -> Result<Json<EchoReply>, StatusCode> {
    let (parts, body) = req.into_parts();

    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    let bytes = axum::body::to_bytes(body, 1 << 20)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let body = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };

    Ok(Json(EchoReply {
        method: parts.method.to_string(),
        url: parts.uri.to_string(),
        headers,
        body,
    }))
}

async fn server_error() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "message": "Internal Server Error" })),
    )
}
