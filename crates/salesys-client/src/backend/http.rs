//! # HTTP Transport
//!
//! Carries [`Invoke`] calls to the backend gateway over HTTP.
//!
//! ```text
//!   invoke("create_sale", {"sale": {...}})
//!        │
//!        ▼
//!   POST {endpoint}/create_sale        body: {"sale": {...}}
//!        │                             Authorization: Bearer <token>
//!        ▼
//!   2xx ───────────────► reply JSON (empty body = null)
//!   502 / 503 / 504 ───► Unreachable
//!   other status ──────► Rejected("<error message>")
//!   no connection ─────► Unreachable
//! ```
//!
//! Error bodies shaped `{"error": "..."}` or a bare JSON string are unwrapped
//! to their message; anything else is passed through as text.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::trace;

use super::rpc::{Invoke, InvokeError};

pub struct HttpTransport {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: endpoint.as_str().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.base
    }

    fn url_for(&self, command: &str) -> String {
        format!("{}/{}", self.base, command)
    }
}

/// Statuses a gateway answers with when the backend behind it is down.
fn is_gateway_failure(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(fields)) => match fields.get("error").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => body.to_string(),
        },
        _ if body.trim().is_empty() => status.to_string(),
        _ => body.to_string(),
    }
}

#[async_trait]
impl Invoke for HttpTransport {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, InvokeError> {
        let url = self.url_for(command);
        trace!(%url, "POST");

        let mut req = self.client.post(&url).json(&args);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| InvokeError::Unreachable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| InvokeError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            return Err(if is_gateway_failure(status) {
                InvokeError::Unreachable(message)
            } else {
                InvokeError::Rejected(message)
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| InvokeError::Rejected(format!("malformed reply: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::rpc::RpcBackend;
    use crate::backend::Backend;
    use crate::error::BackendError;
    use axum::extract::Path;
    use axum::http::{header::AUTHORIZATION, HeaderMap};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use salesys_core::{Money, Product};
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn gateway(
        Path(command): Path<String>,
        headers: HeaderMap,
        Json(args): Json<Value>,
    ) -> Response {
        match command.as_str() {
            "echo" => {
                let auth = headers
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({ "args": args, "auth": auth })).into_response()
            }
            "get_all_products" => {
                let coffee = Product::new(1, "Coffee", "CAF-01", Money::from_cents(1000), 10);
                Json(json!([coffee])).into_response()
            }
            "cancel_sale" => StatusCode::NO_CONTENT.into_response(),
            "create_sale" => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "database is locked" })),
            )
                .into_response(),
            "maintenance" => (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!(format!("unknown command {command}"))))
                .into_response(),
        }
    }

    /// Starts a gateway on a free local port and returns its endpoint.
    async fn serve() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/rpc/{command}", post(gateway));
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        Url::parse(&format!("http://{addr}/rpc/")).unwrap()
    }

    #[tokio::test]
    async fn test_posts_args_with_bearer_token() {
        let transport = HttpTransport::new(serve().await).with_token("s3cret");
        assert!(transport.endpoint().ends_with("/rpc"));

        let reply = transport
            .invoke("echo", json!({ "saleId": 7 }))
            .await
            .unwrap();

        assert_eq!(reply["args"], json!({ "saleId": 7 }));
        assert_eq!(reply["auth"], json!("Bearer s3cret"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_null() {
        let transport = HttpTransport::new(serve().await);
        let reply = transport.invoke("cancel_sale", json!({ "id": 1 })).await;
        assert_eq!(reply, Ok(Value::Null));
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let transport = HttpTransport::new(serve().await);

        let err = transport.invoke("create_sale", json!({})).await.unwrap_err();
        assert_eq!(err, InvokeError::Rejected("database is locked".to_string()));

        let err = transport.invoke("refund", json!({})).await.unwrap_err();
        assert_eq!(err, InvokeError::Rejected("unknown command refund".to_string()));

        let err = transport.invoke("maintenance", json!({})).await.unwrap_err();
        assert_eq!(err, InvokeError::Unreachable("down for maintenance".to_string()));
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Url::parse(&format!("http://{addr}/rpc")).unwrap());
        let err = transport.invoke("get_all_products", json!({})).await.unwrap_err();
        assert!(matches!(err, InvokeError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_rpc_backend_over_http() {
        let backend = RpcBackend::new(HttpTransport::new(serve().await));

        let products = backend.get_all_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Coffee");
        assert_eq!(products[0].price, Money::from_cents(1000));

        backend.cancel_sale(3).await.unwrap();

        let err = backend.get_sale(3).await.unwrap_err();
        assert!(matches!(err, BackendError::Remote { .. }));
    }

    #[test]
    fn test_error_message_shapes() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(error_message(status, r#"{"error":"nope"}"#), "nope");
        assert_eq!(error_message(status, r#""nope""#), "nope");
        assert_eq!(error_message(status, "plain text"), "plain text");
        assert_eq!(error_message(status, ""), "400 Bad Request");
    }
}
