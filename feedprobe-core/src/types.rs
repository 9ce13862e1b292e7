use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct RedditPost {
    pub title: String,
    pub score: i64,
    pub num_comments: u64,
    pub url: String,
    pub selftext: String,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubredditInfo {
    pub display_name: String,
    pub title: String,
    pub subscribers: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub text: Option<String>,
    pub views: Option<i32>,
    pub post_url: String,
}

impl ChannelMessage {
    pub fn post_url_for(channel: &str, id: i32) -> String {
        format!("https://t.me/{}/{}", channel.trim_start_matches('@'), id)
    }

    /// First `max_chars` characters of the text, empty when the message has none.
    pub fn preview(&self, max_chars: usize) -> String {
        self.text
            .as_deref()
            .map(|text| text.chars().take(max_chars).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (@{})",
            self.first_name,
            self.last_name.as_deref().unwrap_or(""),
            self.username.as_deref().unwrap_or("no username")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Group,
    Channel,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Group => "group",
            EntityKind::Channel => "channel",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub id: i64,
    pub kind: EntityKind,
    pub title: String,
    pub username: Option<String>,
}

impl ResolvedEntity {
    pub fn is_channel(&self) -> bool {
        self.kind == EntityKind::Channel
    }
}
