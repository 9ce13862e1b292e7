//! Console rendering for the three tools.

use feedprobe_core::{ChannelMessage, RedditPost, SubredditInfo};
use std::fmt::Display;

pub const PREVIEW_CHARS: usize = 100;

pub const TROUBLESHOOTING_HINTS: [&str; 3] = [
    "Make sure your API credentials are correct",
    "Check your phone number format (include country code)",
    "Ensure you have access to the Telegram app on your phone",
];

pub const AUTH_CANCELLED: &str = "\n\n❌ Authentication cancelled by user";

pub fn subreddit_header(info: &SubredditInfo) -> String {
    format!("Display Name: {}", info.display_name)
}

pub fn post_line(post: &RedditPost) -> String {
    format!("Title: {} | Score: {}", post.title, post.score)
}

pub fn message_block(message: &ChannelMessage) -> String {
    format!(
        "ID: {}, Date: {}, Text: {}...\n  URL: {}\n{}",
        message.id,
        message.date.format("%Y-%m-%d %H:%M:%S%:z"),
        message.preview(PREVIEW_CHARS),
        message.post_url,
        "-".repeat(30)
    )
}

pub fn auth_failure_report(error: &impl Display) -> String {
    let mut report = format!("\n❌ Error during authentication: {}\n\nTroubleshooting:", error);
    for (i, hint) in TROUBLESHOOTING_HINTS.iter().enumerate() {
        report.push_str(&format!("\n{}. {}", i + 1, hint));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use feedprobe_core::TelegramError;

    #[test]
    fn test_post_line() {
        let post = RedditPost {
            title: "Best shawarma in Deira?".to_string(),
            score: 17,
            num_comments: 4,
            url: "https://www.reddit.com/r/dubai/comments/abc".to_string(),
            selftext: String::new(),
            created_utc: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };
        assert_eq!(post_line(&post), "Title: Best shawarma in Deira? | Score: 17");
    }

    #[test]
    fn test_message_block_truncates_text() {
        let message = ChannelMessage {
            id: 812,
            date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            text: Some("x".repeat(250)),
            views: Some(1000),
            post_url: ChannelMessage::post_url_for("dubaionline", 812),
        };
        let block = message_block(&message);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(
            lines[0],
            format!("ID: 812, Date: 2024-05-01 09:30:00+00:00, Text: {}...", "x".repeat(100))
        );
        assert_eq!(lines[1], "  URL: https://t.me/dubaionline/812");
        assert_eq!(lines[2], "-".repeat(30));
    }

    #[test]
    fn test_auth_failure_report_has_hints() {
        let error = TelegramError::InvalidPhone {
            phone: "12".to_string(),
        };
        let report = auth_failure_report(&error);
        assert!(report.contains("❌ Error during authentication: Invalid phone number '12'"));
        assert!(report.contains("Troubleshooting:"));
        assert!(report.contains("2. Check your phone number format (include country code)"));
    }
}
