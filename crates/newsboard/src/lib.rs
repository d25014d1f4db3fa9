//! # Newsboard
//!
//! Realtime discussion threads grouped into daily editions ("newspapers").
//!
//! Readers connect to a thread over a WebSocket and receive a `start`
//! snapshot followed by every admitted post, in order. A thread accepts a
//! fixed number of posts; the post that reaches the limit closes it and
//! queues an LLM summary. Once every thread of an edition has a summary the
//! edition is published and a fresh one is created on the next request.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use newsboard::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn PersistenceClient> = Arc::new(MemoryPersistenceClient::new());
//!
//!     let editions = EditionService::new(Arc::clone(&store), EditionConfig::default());
//!     let edition = editions.current_edition().await?;
//!     let (index, thread) = &edition.threads[0];
//!
//!     let board = ThreadBoard::new(Arc::clone(&store), BoardConfig::default());
//!     let target = ThreadTarget::new(&edition.newspaper.id, *index, &thread.id);
//!
//!     let (subscriber, mut frames) = board.subscriber();
//!     board.attach(&target, subscriber).await?;
//!
//!     let submission = target.submission().with_author("ann").with_body("First!");
//!     let receipt = board.submit(submission).await?;
//!     println!("stored at {}", receipt.sequence_index);
//!
//!     while let Ok(frame) = frames.try_recv() {
//!         println!("{}", frame);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`newsboard-types`**: threads, posts, editions and the realtime event envelope
//! - **`newsboard-persist`**: key-value persistence (in-memory or MongoDB)
//! - **`newsboard-llm`**: text generation client (Gemini) and the summary prompt
//! - **`newsboard-board`**: connection registry, broadcast, post admission,
//!   editions and the summary queue

pub mod prelude;

pub use newsboard_types::{
    BoardConfig, BoardEvent, EditionConfig, Newspaper, Post, PostSubmissionMessage, PostView,
    StoredPost, SummaryConfig, Thread,
};

pub use newsboard_llm::{
    GeminiClient, GeminiConfig, GenerateRequest, GenerateResponse, SummaryPrompt, TextGenerator,
};

pub use newsboard_persist::{
    MemoryPersistenceClient, PersistClientBuilder, PersistError, PersistenceClient,
    StorageBackend,
};

#[cfg(feature = "mongodb")]
pub use newsboard_persist::MongoPersistenceClient;

pub use newsboard_board::{
    AdmissionReceipt, BoardError, ConnectionId, ConnectionRegistry, Edition, EditionService,
    PostSubmission, Subscriber, SummaryQueue, SummaryService, ThreadBoard, ThreadLocks,
    ThreadTarget,
};
