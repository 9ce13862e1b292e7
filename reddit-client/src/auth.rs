//! Application-only OAuth2 for Reddit.
//!
//! Reddit's "client credentials" grant issues a read-only bearer token for the
//! app itself, so no browser round trip or user account is involved. The token
//! request goes through the same `reqwest` client as API calls so the
//! descriptive user agent Reddit requires is always attached.

use feedprobe_core::{CoreError, RedditApiError};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, TokenResponse, TokenUrl,
};
use reqwest::Client;
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info};
use url::Url;

pub const REDDIT_AUTH_BASE: &str = "https://www.reddit.com";

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct RedditToken {
    pub access_token: String,
    pub expires_at: SystemTime,
    pub scope: Vec<String>,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

pub(crate) fn build_oauth_client(
    client_id: &str,
    client_secret: &str,
    auth_base: &str,
) -> Result<BasicClient, CoreError> {
    let base = Url::parse(auth_base).map_err(|e| CoreError::InvalidInput {
        message: format!("Invalid Reddit auth URL '{}': {}", auth_base, e),
    })?;
    let join = |path: &str| {
        base.join(path).map_err(|e| CoreError::InvalidInput {
            message: format!("Invalid Reddit auth path '{}': {}", path, e),
        })
    };

    Ok(BasicClient::new(
        ClientId::new(client_id.to_string()),
        Some(ClientSecret::new(client_secret.to_string())),
        AuthUrl::from_url(join("/api/v1/authorize")?),
        Some(TokenUrl::from_url(join("/api/v1/access_token")?)),
    )
    .set_auth_type(AuthType::BasicAuth))
}

pub(crate) async fn request_app_token(
    oauth: &BasicClient,
    http: &Client,
) -> Result<RedditToken, CoreError> {
    info!("Requesting application-only Reddit token");

    let response = oauth
        .exchange_client_credentials()
        .request_async(|request| send_oauth_request(http, request))
        .await
        .map_err(|e| {
            error!("Reddit token exchange failed: {}", e);
            CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: e.to_string(),
            })
        })?;

    let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
    let scope = response
        .scopes()
        .map(|scopes| scopes.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    debug!("Reddit token valid for {:?}", lifetime);
    Ok(RedditToken {
        access_token: response.access_token().secret().clone(),
        expires_at: SystemTime::now() + lifetime,
        scope,
    })
}

async fn send_oauth_request(
    http: &Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = http
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}
