//! Authenticated request builder, envelope parser and executor.
//!
//! # Design
//! `ApiClient` holds a base URL, a shared [`Session`] and a [`Transport`].
//! Every operation goes through the same three steps:
//!
//! - `build_request` joins the base URL with a relative path, captures the
//!   current credential and attaches it as a bearer header (or omits the
//!   header when there is none).
//! - the transport performs exactly one round-trip.
//! - `parse_response` classifies the result against the envelope contract and
//!   invalidates the session when the backend answers `INVALID_TOKEN`.
//!
//! The build and parse halves are public so a host with its own HTTP stack
//! can drive them directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::envelope::Envelope;
use crate::error::{ApiError, GENERIC_FAILURE, INVALID_TOKEN};
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, ACCEPT, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE,
};
use crate::session::Session;
use crate::transport::{ReqwestTransport, Transport};

/// Typed "no request body" for calls whose body parameter is generic.
pub const NO_BODY: Option<&()> = None;

/// Client for the catalog admin API.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    base_url: String,
    session: Session,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    /// Client over a `reqwest` transport configured from `config`.
    pub fn from_config(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(&config.base_url, session, transport))
    }
}

impl<T> ApiClient<T> {
    pub fn new(base_url: &str, session: Session, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build a JSON request for `path`, relative to the base URL.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.build_request_accepting(method, path, body, APPLICATION_JSON)
    }

    /// Like [`build_request`](Self::build_request) with a caller-chosen `Accept`.
    pub fn build_request_accepting<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        accept: &str,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        if path.contains("://") {
            return Err(ApiError::transport(format!(
                "operation path must be relative to the base url: {path}"
            )));
        }

        let url = if path.starts_with('/') || path.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };
        self.request_to(method, url, body, accept)
    }

    /// Build an authenticated GET for an asset the backend references by URL,
    /// such as a product image or thumbnail.
    pub fn build_asset_request(
        &self,
        reference: &str,
        accept: &str,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resolve_asset_url(reference)?;
        self.request_to(HttpMethod::Get, url, NO_BODY, accept)
    }

    /// Resolve an asset reference against the origin of the base URL.
    ///
    /// Server-root paths such as `/uploads/a.jpg` resolve to the API host. A
    /// reference that lands on any other origin is refused, so the bearer
    /// credential is only ever sent to the API host.
    pub fn resolve_asset_url(&self, reference: &str) -> Result<String, ApiError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ApiError::transport(format!("invalid base url: {e}")))?;
        let resolved = base
            .join(reference)
            .map_err(|e| ApiError::transport(format!("invalid asset url {reference:?}: {e}")))?;
        if resolved.origin() != base.origin() {
            return Err(ApiError::transport(format!(
                "asset url {reference:?} is outside the api origin"
            )));
        }
        Ok(resolved.into())
    }

    fn request_to<B>(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<&B>,
        accept: &str,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut headers = vec![(ACCEPT.to_string(), accept.to_string())];

        let body = match body {
            Some(body) => {
                let encoded = serde_json::to_vec(body)
                    .map_err(|e| ApiError::transport(format!("failed to encode request body: {e}")))?;
                headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
                Some(encoded)
            }
            None => None,
        };

        if let Some(credential) = self.session.credential() {
            headers.push((
                AUTHORIZATION.to_string(),
                format!("Bearer {}", credential.expose()),
            ));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Interpret a response against the envelope contract.
    ///
    /// On success the envelope's `data` is decoded into `D`; a body that is not
    /// an envelope is decoded as a whole, and an empty body reads as `null`.
    pub fn parse_response<D>(&self, response: HttpResponse) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
    {
        let status = response.status;
        if !response.is_success() {
            return Err(self.reject(status, envelope_of(&response.body)));
        }

        let value: Value = if response.body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&response.body)
                .map_err(|e| ApiError::transport(format!("invalid JSON in response: {e}")))?
        };

        let payload = match Envelope::from_value(value) {
            Ok(envelope) if is_rejection(&envelope) => {
                return Err(self.reject(status, Some(envelope)));
            }
            Ok(envelope) => envelope.data.unwrap_or(Value::Null),
            Err(bare) => bare,
        };

        serde_json::from_value(payload)
            .map_err(|e| ApiError::transport(format!("unexpected response shape: {e}")))
    }

    /// Interpret a response whose success body is not JSON.
    ///
    /// Failures are classified exactly as in [`parse_response`](Self::parse_response).
    /// A 2xx response that declares a JSON content type is still checked for
    /// a failed envelope.
    pub fn parse_raw(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        let status = response.status;
        if !response.is_success() {
            return Err(self.reject(status, envelope_of(&response.body)));
        }
        let declares_json = response.headers.iter().any(|(name, value)| {
            name.eq_ignore_ascii_case(CONTENT_TYPE) && value.starts_with(APPLICATION_JSON)
        });
        if declares_json {
            if let Some(envelope) = envelope_of(&response.body) {
                if is_rejection(&envelope) {
                    return Err(self.reject(status, Some(envelope)));
                }
            }
        }
        Ok(response.body)
    }

    fn reject(&self, status: u16, envelope: Option<Envelope>) -> ApiError {
        let error = envelope.and_then(|env| env.error).unwrap_or_default();
        let code = error.code;
        let message = error
            .message
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        if code.as_deref() == Some(INVALID_TOKEN) && self.session.invalidate() {
            info!(status, "credential rejected, session invalidated");
        }
        warn!(status, code = code.as_deref().unwrap_or("-"), %message, "request failed");

        ApiError::Api {
            status,
            code,
            message,
        }
    }
}

impl<T: Transport> ApiClient<T> {
    /// Perform one authenticated JSON request and unwrap its envelope.
    ///
    /// Exactly one attempt is made; callers decide whether to retry.
    pub async fn execute<D, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, body)?;
        let response = self.send(request).await?;
        self.parse_response(response)
    }

    /// Perform one authenticated request and return the raw success body.
    pub async fn execute_raw<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        accept: &str,
    ) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request_accepting(method, path, body, accept)?;
        let response = self.send(request).await?;
        self.parse_raw(response)
    }

    /// Fetch an asset referenced by URL with the session credential attached.
    ///
    /// Failures are classified like any other call, so an `INVALID_TOKEN`
    /// answer still ends the session.
    pub async fn fetch_asset(&self, reference: &str, accept: &str) -> Result<Vec<u8>, ApiError> {
        let request = self.build_asset_request(reference, accept)?;
        let response = self.send(request).await?;
        self.parse_raw(response)
    }

    pub async fn get<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        self.execute(HttpMethod::Get, path, NO_BODY).await
    }

    pub async fn post<D, B>(&self, path: &str, body: &B) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Post, path, Some(body)).await
    }

    pub async fn put<D, B>(&self, path: &str, body: &B) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Put, path, Some(body)).await
    }

    pub async fn delete<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        self.execute(HttpMethod::Delete, path, NO_BODY).await
    }

    /// Execute a declared endpoint with positional path parameters.
    pub(crate) async fn call<D, B>(
        &self,
        endpoint: Endpoint,
        params: &[&(dyn std::fmt::Display + Sync)],
        body: Option<&B>,
    ) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(endpoint.method, &endpoint.path(params)?, body)
            .await
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            method = %request.method,
            url = %request.url,
            authenticated = request.header(AUTHORIZATION).is_some(),
            "sending request"
        );
        let response = self.transport.send(request).await;
        match &response {
            Ok(r) => debug!(status = r.status, bytes = r.body.len(), "received response"),
            Err(e) => warn!(error = %e, "transport failure"),
        }
        response
    }
}

fn envelope_of(body: &[u8]) -> Option<Envelope> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| Envelope::from_value(value).ok())
}

/// A 2xx envelope is a failure when it says so, or when it reports a rejected
/// credential.
fn is_rejection(envelope: &Envelope) -> bool {
    envelope.is_failure() || envelope.error_code() == Some(INVALID_TOKEN)
}
