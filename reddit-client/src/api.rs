use chrono::{DateTime, Utc};
use feedprobe_core::{CoreError, RedditApiError, RedditPost, SubredditInfo};
use reqwest::{redirect, Client, Method, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing<T> {
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingChild<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditPostData {
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
    pub created_utc: f64,
    pub score: i64,
    pub num_comments: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditSubredditData {
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subscribers: Option<u64>,
}

#[derive(Debug)]
pub struct RedditApiClient {
    http_client: Client,
    api_base: String,
    user_agent: String,
}

impl RedditApiClient {
    pub fn new(user_agent: String, api_base: &str) -> Result<Self, CoreError> {
        // Reddit answers unknown subreddits with a redirect to the search page.
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            user_agent,
        })
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        access_token: &str,
        query_params: Option<&[(&str, &str)]>,
    ) -> Result<Response, CoreError> {
        let url = format!("{}{}", self.api_base, endpoint);

        let mut request_builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(access_token);

        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }

        info!("Making Reddit API request: {} {}", method, endpoint);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::RedditApi(RedditApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        let api_error = match status.as_u16() {
            401 => RedditApiError::InvalidToken,
            403 => RedditApiError::Forbidden {
                resource: endpoint.to_string(),
            },
            404 | 301 | 302 => RedditApiError::SubredditNotFound {
                subreddit: subreddit_from_endpoint(endpoint),
            },
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(60);
                RedditApiError::RateLimitExceeded { retry_after }
            }
            code if status.is_server_error() => RedditApiError::ServerError { status_code: code },
            code => RedditApiError::InvalidResponse {
                details: format!("Unexpected status {} for {}", code, endpoint),
            },
        };
        Err(CoreError::RedditApi(api_error))
    }

    /// Newest-first listing of `subreddit`.
    pub async fn get_new_posts(
        &self,
        access_token: &str,
        subreddit: &str,
        limit: u32,
    ) -> Result<RedditListing<RedditPostData>, CoreError> {
        let endpoint = format!("/r/{}/new", subreddit);
        let limit_str = limit.to_string();
        let params = [("limit", limit_str.as_str()), ("raw_json", "1")];

        let response = self
            .make_request(Method::GET, &endpoint, access_token, Some(&params))
            .await?;

        let listing: RedditListing<RedditPostData> = response.json().await.map_err(|e| {
            error!("Failed to parse subreddit posts: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse posts for r/{}", subreddit),
            })
        })?;

        info!(
            "Retrieved {} posts from r/{}",
            listing.data.children.len(),
            subreddit
        );
        Ok(listing)
    }

    pub async fn get_subreddit_info(
        &self,
        access_token: &str,
        subreddit: &str,
    ) -> Result<RedditSubredditData, CoreError> {
        let endpoint = format!("/r/{}/about", subreddit);

        let response = self
            .make_request(Method::GET, &endpoint, access_token, None)
            .await?;

        let subreddit_response: RedditListingChild<RedditSubredditData> =
            response.json().await.map_err(|e| {
                error!("Failed to parse subreddit info: {}", e);
                CoreError::RedditApi(RedditApiError::InvalidResponse {
                    details: format!("Failed to parse info for r/{}", subreddit),
                })
            })?;

        debug!("Retrieved info for r/{}", subreddit);
        Ok(subreddit_response.data)
    }
}

fn subreddit_from_endpoint(endpoint: &str) -> String {
    endpoint
        .strip_prefix("/r/")
        .and_then(|rest| rest.split('/').next())
        .unwrap_or(endpoint)
        .to_string()
}

impl From<RedditPostData> for RedditPost {
    fn from(post_data: RedditPostData) -> Self {
        let secs = post_data.created_utc.trunc() as i64;
        let nanos = (post_data.created_utc.fract() * 1e9) as u32;
        let created_utc: DateTime<Utc> = DateTime::from_timestamp(secs, nanos).unwrap_or_default();

        Self {
            title: post_data.title,
            score: post_data.score,
            num_comments: post_data.num_comments,
            url: post_data.url,
            selftext: post_data.selftext,
            created_utc,
        }
    }
}

impl From<RedditSubredditData> for SubredditInfo {
    fn from(data: RedditSubredditData) -> Self {
        Self {
            display_name: data.display_name,
            title: data.title,
            subscribers: data.subscribers.unwrap_or(0),
        }
    }
}
