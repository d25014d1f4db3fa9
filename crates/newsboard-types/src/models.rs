use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used by every read-facing post and edition view
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(DISPLAY_TIME_FORMAT).to_string()
}

/// Thread metadata, stored under `(newspaper_id, thread_index)`
///
/// `enabled` flips from `true` to `false` exactly once, when the thread
/// reaches its post limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub enabled: bool,
    pub summary: Option<String>,
}

impl Thread {
    /// New open thread with a fresh id
    pub fn open(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            enabled: true,
            summary: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.enabled
    }

    /// Same metadata with `enabled = false`
    pub fn closed(&self) -> Self {
        Self {
            enabled: false,
            ..self.clone()
        }
    }

    pub fn with_summary(&self, summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..self.clone()
        }
    }
}

/// A single post as persisted in the post store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    /// One transcript line, as fed to the summarizer
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.author, self.body)
    }
}

/// A post together with its sequence position inside the thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPost {
    pub index: u64,
    pub post: Post,
}

/// Newspaper edition: a batch of threads generated together
///
/// `enabled = false` while the edition is still collecting posts,
/// `enabled = true` once it has been published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Newspaper {
    pub id: String,
    pub enabled: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl Newspaper {
    pub fn running() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            enabled: false,
            published_at: None,
        }
    }

    pub fn published(at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            enabled: true,
            published_at: Some(at),
        }
    }

    pub fn is_published(&self) -> bool {
        self.enabled && self.published_at.is_some()
    }

    pub fn publish(&self, at: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            enabled: true,
            published_at: Some(at),
        }
    }
}

/// Wire shape of a post sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub author: String,
    pub body: String,
    pub created_at: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            author: post.author.clone(),
            body: post.body.clone(),
            created_at: format_timestamp(&post.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_post_view_formats_timestamp() {
        let post = Post {
            author: "Anonymous".to_string(),
            body: "first".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap(),
        };

        let view = PostView::from(&post);
        assert_eq!(view.created_at, "2024-03-07 09:05:01");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["createdAt"], "2024-03-07 09:05:01");
        assert_eq!(json["author"], "Anonymous");
    }

    #[test]
    fn test_thread_close_keeps_metadata() {
        let thread = Thread::open("Rail strike enters third day").with_summary("text");
        let closed = thread.closed();

        assert!(thread.is_open());
        assert!(!closed.is_open());
        assert_eq!(closed.id, thread.id);
        assert_eq!(closed.title, thread.title);
        assert_eq!(closed.summary.as_deref(), Some("text"));
    }

    #[test]
    fn test_newspaper_publish() {
        let running = Newspaper::running();
        assert!(!running.is_published());

        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let published = running.publish(at);
        assert!(published.is_published());
        assert_eq!(published.id, running.id);
    }

    #[test]
    fn test_transcript_line() {
        let post = Post::new("kumo", "is it raining?");
        assert_eq!(post.transcript_line(), "kumo: is it raining?");
    }
}
