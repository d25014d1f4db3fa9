//! Prelude module for convenient imports
//!
//! ```rust
//! use newsboard::prelude::*;
//! ```

pub use crate::{
    BoardConfig, BoardEvent, EditionConfig, SummaryConfig, Thread, Post, Newspaper,
    TextGenerator, GeminiClient, GeminiConfig,
    PersistenceClient, MemoryPersistenceClient, PersistClientBuilder, StorageBackend,
    ThreadBoard, ThreadTarget, PostSubmission, EditionService, SummaryService, SummaryQueue,
    ThreadLocks,
    BoardError,
};
