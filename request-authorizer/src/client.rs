use crate::error::{ApiError, Result};
use crate::models::{ApiRequest, ApiResponse};
use crate::transport::{GatewayTransport, ReqwestTransport};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use session_manager::SessionManager;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// HTTP surface for the domain views, wrapping every call in the
/// authorization middleware.
pub struct ApiClient {
    transport: Arc<dyn GatewayTransport>,
    session: Arc<SessionManager>,
    gateway_origin: Url,
}

impl ApiClient {
    #[must_use]
    pub fn new(
        transport: Arc<dyn GatewayTransport>,
        session: Arc<SessionManager>,
        gateway_origin: Url,
    ) -> Self {
        Self {
            transport,
            session,
            gateway_origin,
        }
    }

    /// Client over the production `reqwest` transport.
    #[must_use]
    pub fn with_reqwest(session: Arc<SessionManager>, gateway_origin: Url) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), session, gateway_origin)
    }

    /// Issue a gateway call by path, relative to the configured origin.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] when the gateway rejects the call after the
    /// single refresh-and-retry; transport and session errors otherwise.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let url = self.gateway_origin.join(path)?;
        let mut request = ApiRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.execute(request).await
    }

    /// Run one request through the middleware.
    ///
    /// Gateway calls carry the current access token and get at most one
    /// retry, after a refresh coordinated through the session manager's
    /// single-flight path; everything else passes through untouched.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        if !self.targets_gateway(&request.url) {
            return self.transport.execute(&request, None).await;
        }

        let token = self.session.access_token();
        let first = self.transport.execute(&request, token.as_deref()).await?;
        if first.status != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        if !self.session.has_refresh_token() {
            warn!(url = %request.url, "401 with no refresh token; forcing logout");
            self.session.logout().await;
            return Err(ApiError::Unauthorized);
        }

        debug!(url = %request.url, "401 from gateway; renewing token before one retry");
        if let Err(err) = self.session.refresh().await {
            self.session.logout().await;
            return Err(ApiError::Session(err));
        }

        let renewed = self.session.access_token();
        let retry = self.transport.execute(&request, renewed.as_deref()).await?;
        if retry.status == StatusCode::UNAUTHORIZED {
            warn!(url = %request.url, "still unauthorized after renewal; forcing logout");
            self.session.logout().await;
            return Err(ApiError::Unauthorized);
        }
        Ok(retry)
    }

    fn targets_gateway(&self, url: &Url) -> bool {
        url.origin() == self.gateway_origin.origin()
    }
}
