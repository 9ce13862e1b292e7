pub mod api;
pub mod auth;

pub use api::{RedditApiClient, RedditPostData, REDDIT_API_BASE};
pub use auth::{RedditToken, REDDIT_AUTH_BASE};

use feedprobe_core::{
    ConfigError, CoreError, RedditPost, RedditSettings, SubredditInfo,
};
use oauth2::basic::BasicClient;
use tracing::{info, warn};

/// Reddit caps a single listing page at this many items.
pub const MAX_LISTING_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditCredentials {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client_id,
            client_secret,
            user_agent,
        }
    }

    pub fn from_settings(settings: &RedditSettings) -> Self {
        Self::new(
            settings.client_id.clone(),
            settings.client_secret.clone(),
            settings.user_agent.clone(),
        )
    }

    /// Empty credentials are a caller error and never reach the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("user_agent", &self.user_agent),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: format!("reddit.{}", field),
                });
            }
        }
        Ok(())
    }
}

pub struct RedditClient {
    oauth: BasicClient,
    api: RedditApiClient,
    token: Option<RedditToken>,
}

impl RedditClient {
    pub fn new(credentials: RedditCredentials) -> Result<Self, CoreError> {
        Self::with_endpoints(credentials, REDDIT_AUTH_BASE, REDDIT_API_BASE)
    }

    pub fn with_endpoints(
        credentials: RedditCredentials,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, CoreError> {
        credentials.validate()?;

        let oauth = auth::build_oauth_client(
            &credentials.client_id,
            &credentials.client_secret,
            auth_base,
        )?;
        let api = RedditApiClient::new(credentials.user_agent, api_base)?;

        Ok(Self {
            oauth,
            api,
            token: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_expired())
    }

    pub fn token(&self) -> Option<&RedditToken> {
        self.token.as_ref()
    }

    pub async fn authenticate(&mut self) -> Result<&RedditToken, CoreError> {
        let token = auth::request_app_token(&self.oauth, self.api.http_client()).await?;
        info!("Authenticated with Reddit (scopes: {:?})", token.scope);
        Ok(self.token.insert(token))
    }

    pub async fn subreddit_info(&mut self, subreddit: &str) -> Result<SubredditInfo, CoreError> {
        let name = normalize_subreddit(subreddit)?;
        let access_token = self.access_token().await?;
        let data = self.api.get_subreddit_info(&access_token, &name).await?;
        Ok(data.into())
    }

    /// Up to `limit` posts from `subreddit`, most recent first.
    pub async fn fetch_new_posts(
        &mut self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RedditPost>, CoreError> {
        let name = normalize_subreddit(subreddit)?;
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = if limit > MAX_LISTING_LIMIT {
            warn!(
                "Requested {} posts, Reddit returns at most {} per listing",
                limit, MAX_LISTING_LIMIT
            );
            MAX_LISTING_LIMIT
        } else {
            limit
        };

        let access_token = self.access_token().await?;
        let listing = self.api.get_new_posts(&access_token, &name, limit).await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .take(limit as usize)
            .map(|child| RedditPost::from(child.data))
            .collect())
    }

    async fn access_token(&mut self) -> Result<String, CoreError> {
        if !self.is_authenticated() {
            self.authenticate().await?;
        }
        self.token
            .as_ref()
            .map(|token| token.access_token.clone())
            .ok_or_else(|| CoreError::Internal {
                message: "Reddit token missing after authentication".to_string(),
            })
    }
}

fn normalize_subreddit(subreddit: &str) -> Result<String, CoreError> {
    let name = subreddit.trim().trim_start_matches("/r/").trim_start_matches("r/");
    if name.is_empty() {
        return Err(CoreError::InvalidInput {
            message: "Subreddit name cannot be empty".to_string(),
        });
    }
    Ok(name.to_string())
}
