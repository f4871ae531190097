//! Phiacta API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Response caching for public reads
//! - Bearer-token sessions persisted by [`TokenStore`]

pub mod session;

use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Agent, AuthResponse, Claim, ClaimFilters, ConfidenceStatus, LoginRequest, Namespace,
    NeighborsResponse, NewClaim, NewReview, PaginatedResponse, PublicAgent, RegisterRequest,
    Relation, Review, SearchResponse, Source, VerificationStatus, VerificationSubmission,
};
pub use session::{LogoutCoordinator, TokenStore};

/// Fallback messages when the API gives no `detail`.
const LOGIN_FAILED: &str = "Invalid email or password.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Phiacta API client.
#[derive(Clone)]
pub struct PhiactaClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Same connection pool without retries, for the health probe.
    probe: Client,

    /// Response cache for public GETs.
    cache: Cache<String, serde_json::Value>,

    /// API base URL.
    base: Url,

    /// Persisted session token.
    tokens: TokenStore,

    /// Guards the 401 logout against concurrent failures.
    logout: LogoutCoordinator,
}

impl PhiactaClient {
    /// Create a new client with the given configuration.
    ///
    /// The token file is not read; call [`PhiactaClient::load_session`] or
    /// [`PhiactaClient::restore_session`] for that.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let base = Url::parse(&config.api_url)?;
        anyhow::ensure!(!base.cannot_be_a_base(), "API URL '{}' cannot be a base", base);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(10))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(http.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            probe: http,
            cache,
            base,
            tokens: TokenStore::new(config.token_path),
            logout: LogoutCoordinator::new(),
        })
    }

    /// Create a client for server-side use, preferring the internal API URL.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn for_server(config: &Config) -> anyhow::Result<Self> {
        let server = Config { api_url: config.server_api_url().to_string(), ..config.clone() };
        Self::new(server)
    }

    /// API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Session token store.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Read the persisted token, if any, without validating it.
    ///
    /// # Errors
    ///
    /// Returns error if the token file exists but cannot be read.
    pub async fn load_session(&self) -> ClientResult<bool> {
        Ok(self.tokens.load().await?.is_some())
    }

    /// Whether a token is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.get().await.is_some()
    }

    // --- Public reads ---

    /// List all namespaces.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn list_namespaces(&self) -> ClientResult<PaginatedResponse<Namespace>> {
        let params = vec![("limit".to_string(), api::NAMESPACE_LIMIT.to_string())];
        self.get(&["v1", "namespaces"], &params).await
    }

    /// List claims, newest first, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn list_claims(
        &self,
        limit: u64,
        offset: u64,
        filters: &ClaimFilters,
    ) -> ClientResult<PaginatedResponse<Claim>> {
        let mut params = vec![
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        params.extend(filters.to_params());

        self.get(&["v1", "claims"], &params).await
    }

    /// List submitted sources.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn list_sources(
        &self,
        limit: u64,
        offset: u64,
    ) -> ClientResult<PaginatedResponse<Source>> {
        let params = vec![
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        self.get(&["v1", "sources"], &params).await
    }

    /// Get a single claim by ID.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_claim(&self, id: &str) -> ClientResult<Claim> {
        self.get(&["v1", "claims", id], &[]).await
    }

    /// Get the relations touching a claim.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_claim_relations(&self, id: &str) -> ClientResult<Vec<Relation>> {
        self.get(&["v1", "claims", id, "relations"], &[]).await
    }

    /// Full-text search over claims.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_claims(&self, query: &str) -> ClientResult<SearchResponse> {
        #[derive(Serialize)]
        struct SearchRequest<'a> {
            query: &'a str,
        }

        self.post_public(&["v1", "search"], &SearchRequest { query }).await
    }

    /// Get the aggregated review signal for a claim.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_confidence(&self, id: &str) -> ClientResult<ConfidenceStatus> {
        self.get(&["layers", "confidence", "claims", id, "status"], &[]).await
    }

    /// Get graph neighbors of a claim.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_neighbors(&self, id: &str) -> ClientResult<NeighborsResponse> {
        self.get(&["layers", "graph", "claims", id, "neighbors"], &[]).await
    }

    /// Get the code-verification status of a claim.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_verification_status(&self, id: &str) -> ClientResult<VerificationStatus> {
        self.get(&["v1", "claims", id, "verification"], &[]).await
    }

    /// Get the reviews of a claim.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_claim_reviews(&self, id: &str) -> ClientResult<Vec<Review>> {
        self.get(&["v1", "claims", id, "reviews"], &[]).await
    }

    /// Get the public profile of an agent.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_agent(&self, id: &str) -> ClientResult<PublicAgent> {
        self.get(&["v1", "agents", id], &[]).await
    }

    /// Probe the backend health endpoint once. Never cached or retried.
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or unhealthy.
    pub async fn backend_health(&self) -> ClientResult<serde_json::Value> {
        let mut url = self.base.clone();
        url.set_path(&format!("{}{}", url.path().trim_end_matches('/'), api::HEALTH_PATH));

        let response = self.probe.get(url).send().await?;
        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }

    // --- Authenticated writes ---

    /// Submit a new claim.
    ///
    /// # Errors
    ///
    /// Returns error if not signed in or on API failure.
    pub async fn create_claim(&self, claim: &NewClaim) -> ClientResult<Claim> {
        self.send_authed(Method::POST, &["v1", "claims"], Some(claim)).await
    }

    /// Submit a review of a claim.
    ///
    /// # Errors
    ///
    /// Returns error if not signed in or on API failure.
    pub async fn submit_review(&self, claim_id: &str, review: &NewReview) -> ClientResult<Review> {
        self.send_authed(Method::POST, &["v1", "claims", claim_id, "reviews"], Some(review)).await
    }

    /// Attach code to a claim for verification.
    ///
    /// # Errors
    ///
    /// Returns error if not signed in or on API failure.
    pub async fn submit_verification(
        &self,
        claim_id: &str,
        submission: &VerificationSubmission,
    ) -> ClientResult<Claim> {
        self.send_authed(Method::POST, &["v1", "claims", claim_id, "verify"], Some(submission))
            .await
    }

    // --- Auth ---

    /// Sign in and persist the returned token.
    ///
    /// # Errors
    ///
    /// Returns error on bad credentials, rate limiting or API failure.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        self.authenticate(&["v1", "auth", "login"], &body, LOGIN_FAILED).await
    }

    /// Create an account and persist the returned token.
    ///
    /// # Errors
    ///
    /// Returns error on rejection, rate limiting or API failure.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.authenticate(&["v1", "auth", "register"], &body, REGISTER_FAILED).await
    }

    /// The agent owning the current token.
    ///
    /// # Errors
    ///
    /// Returns error if not signed in, the token is rejected, or on API failure.
    pub async fn me(&self) -> ClientResult<Agent> {
        self.send_authed::<Agent, ()>(Method::GET, &["v1", "auth", "me"], None).await
    }

    /// Load the persisted token and check it is still accepted.
    ///
    /// Returns `None` when there is no token or the API refused it; a refused
    /// token is removed. Outages, rate limits and transport failures keep the
    /// token and are returned.
    ///
    /// # Errors
    ///
    /// Returns error if the token file cannot be read or the API is unreachable
    /// or failing.
    pub async fn restore_session(&self) -> ClientResult<Option<Agent>> {
        if !self.load_session().await? {
            return Ok(None);
        }

        match self.me().await {
            Ok(agent) => {
                tracing::debug!(agent = %agent.name, "Restored session");
                Ok(Some(agent))
            }
            // Already cleared by `expire_session`.
            Err(ClientError::SessionExpired) => Ok(None),
            Err(e) if e.is_rejection() => {
                tracing::warn!(error = %e, "Stored token rejected, signing out");
                self.tokens.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Forget the session token.
    ///
    /// # Errors
    ///
    /// Returns error if the token file cannot be removed.
    pub async fn logout(&self) -> ClientResult<()> {
        self.tokens.clear().await?;
        Ok(())
    }

    // --- Plumbing ---

    /// Build an endpoint URL from path segments (each segment is percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make a cached public GET request.
    async fn get<T>(&self, segments: &[&str], params: &[(String, String)]) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments);

        // Check cache
        let cache_key = cache_key("GET", url.as_str(), params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::trace!(url = %url, "Cache hit");
            return serde_json::from_value(cached).map_err(ClientError::from);
        }

        tracing::debug!(url = %url, "GET");
        let response = self.client.get(url).query(params).send().await?;

        let response = handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        // Cache response
        self.cache.insert(cache_key, value.clone()).await;

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Make an unauthenticated POST request.
    async fn post_public<T, B>(&self, segments: &[&str], body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments);
        tracing::debug!(url = %url, "POST");

        let body_str = serde_json::to_string(body)?;
        let response = self.client.post(url).body(body_str).send().await?;

        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// POST credentials to an auth endpoint and store the issued token.
    async fn authenticate<B>(
        &self,
        segments: &[&str],
        body: &B,
        fallback: &str,
    ) -> ClientResult<AuthResponse>
    where
        B: Serialize,
    {
        let url = self.endpoint(segments);
        let body_str = serde_json::to_string(body)?;
        let response = self.client.post(url).body(body_str).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::rate_limited(retry_after_secs(response.headers())));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = error_detail(&text).unwrap_or_else(|| fallback.to_string());
            tracing::info!(status = status.as_u16(), "Authentication refused");
            return Err(ClientError::api(status.as_u16(), detail));
        }

        let auth: AuthResponse = response.json().await?;
        self.tokens.set(&auth.access_token).await?;
        tracing::info!(agent = %auth.agent.name, "Signed in");
        Ok(auth)
    }

    /// Make a request carrying the session token. Never cached.
    async fn send_authed<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.tokens.get().await.ok_or(ClientError::NotAuthenticated)?;
        let url = self.endpoint(segments);
        tracing::debug!(method = %method, url = %url, "Authenticated request");

        let mut request =
            self.client.request(method, url).header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = body {
            request = request.body(serde_json::to_string(body)?);
        }
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.expire_session().await;
            return Err(ClientError::SessionExpired);
        }

        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// Drop the rejected token; concurrent callers leave it to the first one.
    async fn expire_session(&self) {
        if !self.logout.begin() {
            tracing::debug!("Logout already in progress");
            return;
        }

        tracing::warn!("Session expired, clearing stored token");
        if let Err(e) = self.tokens.clear().await {
            tracing::error!(error = %e, "Failed to clear stored token");
        }
        self.logout.finish();
    }
}

impl std::fmt::Debug for PhiactaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhiactaClient")
            .field("base_url", &self.base.as_str())
            .field("token_path", &self.tokens.path())
            .finish()
    }
}

/// Handle API response status codes.
async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::rate_limited(retry_after_secs(response.headers())));
    }

    let text = response.text().await.unwrap_or_default();
    if let Some(detail) = error_detail(&text) {
        return Err(ClientError::api(status.as_u16(), detail));
    }

    match status.as_u16() {
        404 => Err(ClientError::not_found(text)),
        400 => Err(ClientError::bad_request(text)),
        500..=599 => Err(ClientError::server(status.as_u16(), text)),
        _ => {
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                text
            };
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message })
        }
    }
}

/// `Retry-After` in seconds, 60 when absent or unparsable.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(60)
}

/// Extract the human-readable `detail` from a JSON error body.
///
/// `detail` is either a string or a list of validation errors carrying `msg`.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> =
                items.iter().filter_map(|item| item.get("msg")?.as_str()).collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Generate cache key.
fn cache_key(method: &str, url: &str, params: &[(String, String)]) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(method.as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());
    hasher.update(b"|");

    for (k, v) in params {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_string() {
        assert_eq!(error_detail(r#"{"detail":"Claim not found"}"#).as_deref(), Some("Claim not found"));
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","content"],"msg":"field required"},{"msg":"too short"}]}"#;
        assert_eq!(error_detail(body).as_deref(), Some("field required; too short"));
    }

    #[test]
    fn test_error_detail_absent() {
        assert_eq!(error_detail("not json"), None);
        assert_eq!(error_detail(r#"{"error":"x"}"#), None);
        assert_eq!(error_detail(r#"{"detail":""}"#), None);
    }

    #[test]
    fn test_cache_key_depends_on_params() {
        let a = cache_key("GET", "http://x/v1/claims", &[("limit".into(), "20".into())]);
        let b = cache_key("GET", "http://x/v1/claims", &[("limit".into(), "50".into())]);
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let config = Config::for_testing("http://localhost:8000/base/", "/tmp/unused-token");
        let client = PhiactaClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(&["v1", "claims", "a/b"]).as_str(),
            "http://localhost:8000/base/v1/claims/a%2Fb"
        );
    }
}
