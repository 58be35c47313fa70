use crate::error::Result;
use crate::models::{ApiRequest, ApiResponse};
use async_trait::async_trait;
use serde_json::Value;

/// Transport seam under the authorizer, so the retry logic is testable
/// without a network.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse>;
}

/// Production transport backed by `reqwest`.
///
/// Timeout semantics are left to the underlying client; the authorizer does
/// not impose its own timeout layer.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GatewayTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone());
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.ok();
        Ok(ApiResponse { status, body })
    }
}
