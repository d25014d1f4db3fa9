pub mod config;
pub mod events;
pub mod models;

pub use config::{BoardConfig, EditionConfig, SummaryConfig};
pub use events::{BoardEvent, PostSubmissionMessage};
pub use models::{
    format_timestamp, Newspaper, Post, PostView, StoredPost, Thread,
    DISPLAY_TIME_FORMAT,
};
