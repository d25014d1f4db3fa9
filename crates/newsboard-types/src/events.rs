use serde::{Deserialize, Serialize};

use crate::models::{Post, PostView, Thread};

/// Realtime envelope pushed to thread subscribers over the WebSocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// Snapshot sent once, right after a connection subscribes
    Start {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thread: Option<Thread>,
        posts: Vec<PostView>,
    },

    /// A post was admitted to the thread
    NewPost {
        index: u64,
        post: PostView,
    },

    /// A post was admitted and it closed the thread
    MaxNewPost {
        index: u64,
        post: PostView,
    },

    /// Post rejected: the thread already holds its limit
    Full {
        message: String,
    },

    /// Malformed request or missing thread
    Error {
        message: String,
    },
}

impl BoardEvent {
    /// Event announcing an admitted post
    pub fn admitted(index: u64, post: &Post, limit_reached: bool) -> Self {
        let post = PostView::from(post);
        if limit_reached {
            BoardEvent::MaxNewPost { index, post }
        } else {
            BoardEvent::NewPost { index, post }
        }
    }

    pub fn full(message: impl Into<String>) -> Self {
        BoardEvent::Full {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        BoardEvent::Error {
            message: message.into(),
        }
    }

    /// Wire tag of this event
    pub fn kind(&self) -> &'static str {
        match self {
            BoardEvent::Start { .. } => "start",
            BoardEvent::NewPost { .. } => "new_post",
            BoardEvent::MaxNewPost { .. } => "max_new_post",
            BoardEvent::Full { .. } => "full",
            BoardEvent::Error { .. } => "error",
        }
    }
}

/// Inbound text frame: a post submission from a connected client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSubmissionMessage {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
}
