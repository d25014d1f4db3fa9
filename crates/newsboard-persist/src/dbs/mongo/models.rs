use chrono::{DateTime, Utc};
use newsboard_types::{Newspaper, Post, Thread};
use serde::{Deserialize, Serialize};

/// Post document; `(thread_id, index)` is unique
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPost {
    pub thread_id: String,
    pub index: i64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl MongoPost {
    pub fn new(thread_id: &str, index: i64, post: Post) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            index,
            author: post.author,
            body: post.body,
            created_at: post.created_at,
        }
    }
}

impl From<MongoPost> for Post {
    fn from(doc: MongoPost) -> Self {
        Self {
            author: doc.author,
            body: doc.body,
            created_at: doc.created_at,
        }
    }
}

/// Per-thread sequence counter, advanced with `$inc`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCounter {
    #[serde(rename = "_id")]
    pub thread_id: String,
    pub seq: i64,
}

/// Thread metadata document; `(newspaper_id, index)` is unique
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    pub newspaper_id: String,
    pub index: i64,
    pub id: String,
    pub title: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl MongoThread {
    pub fn new(newspaper_id: &str, index: u32, thread: Thread) -> Self {
        Self {
            newspaper_id: newspaper_id.to_string(),
            index: i64::from(index),
            id: thread.id,
            title: thread.title,
            enabled: thread.enabled,
            summary: thread.summary,
        }
    }
}

impl From<MongoThread> for Thread {
    fn from(doc: MongoThread) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            enabled: doc.enabled,
            summary: doc.summary,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoNewspaper {
    #[serde(rename = "_id")]
    pub id: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl From<Newspaper> for MongoNewspaper {
    fn from(newspaper: Newspaper) -> Self {
        Self {
            id: newspaper.id,
            enabled: newspaper.enabled,
            published_at: newspaper.published_at,
        }
    }
}

impl From<MongoNewspaper> for Newspaper {
    fn from(doc: MongoNewspaper) -> Self {
        Self {
            id: doc.id,
            enabled: doc.enabled,
            published_at: doc.published_at,
        }
    }
}
