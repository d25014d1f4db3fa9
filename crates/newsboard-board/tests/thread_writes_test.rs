use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use newsboard_board::{BoardError, EditionService, SummaryService, ThreadBoard, ThreadTarget};
use newsboard_llm::{GenerateRequest, GenerateResponse, TextGenerator};
use newsboard_persist::{MemoryPersistenceClient, PersistenceClient};
use newsboard_types::{BoardConfig, EditionConfig, Post, SummaryConfig, Thread};
use tokio::sync::Notify;

/// Answers only once the test releases it
#[derive(Default)]
struct GatedGenerator {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, _request: GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(GenerateResponse {
            text: "Commuters brace for a week of cancelled trains.".to_string(),
            model: "test".to_string(),
            finish_reason: Some("STOP".to_string()),
            raw: serde_json::Value::Null,
        })
    }
}

async fn seeded_board(limit: u64) -> (Arc<dyn PersistenceClient>, ThreadBoard, ThreadTarget) {
    let store: Arc<dyn PersistenceClient> = Arc::new(MemoryPersistenceClient::new());
    let thread = Thread::open("Rail strike enters third day");
    store.put_thread("paper-1", 0, thread.clone()).await.unwrap();

    let board = ThreadBoard::new(
        Arc::clone(&store),
        BoardConfig::new().with_post_limit(limit),
    );
    (store, board, ThreadTarget::new("paper-1", 0, thread.id))
}

#[tokio::test]
async fn test_summary_written_after_close_keeps_thread_closed() {
    let store: Arc<dyn PersistenceClient> = Arc::new(MemoryPersistenceClient::new());
    let editions = Arc::new(EditionService::new(
        Arc::clone(&store),
        EditionConfig::default().with_threads_per_edition(1),
    ));
    let edition = editions.current_edition().await.unwrap();
    let newspaper_id = edition.newspaper.id.clone();
    let (index, thread) = edition.threads[0].clone();

    let board = ThreadBoard::new(
        Arc::clone(&store),
        BoardConfig::new().with_post_limit(1),
    );
    let generator = Arc::new(GatedGenerator::default());
    let service = Arc::new(SummaryService::new(
        Arc::clone(&store),
        Arc::clone(&generator) as Arc<dyn TextGenerator>,
        editions,
        board.thread_locks().clone(),
        SummaryConfig::default(),
    ));

    let pending = {
        let service = Arc::clone(&service);
        let newspaper_id = newspaper_id.clone();
        tokio::spawn(async move { service.generate(&newspaper_id, index).await })
    };
    tokio::time::timeout(Duration::from_secs(1), generator.entered.notified())
        .await
        .expect("generator never called");

    // The thread fills while the model is still answering
    let target = ThreadTarget::new(&newspaper_id, index, &thread.id);
    let receipt = board
        .submit(target.submission().with_body("last word"))
        .await
        .unwrap();
    assert!(receipt.limit_reached);

    generator.release.notify_one();
    let summarized = tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("summary never finished")
        .unwrap()
        .unwrap();
    assert!(!summarized.enabled);

    let stored = store.get_thread(&newspaper_id, index).await.unwrap().unwrap();
    assert!(!stored.enabled);
    assert_eq!(
        stored.summary.as_deref(),
        Some("Commuters brace for a week of cancelled trains.")
    );

    let err = board
        .submit(target.submission().with_body("one more"))
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::ThreadFull { .. }));
}

#[tokio::test]
async fn test_seeding_replaces_existing_posts() {
    let (store, board, target) = seeded_board(20).await;
    for i in 0..12 {
        store
            .append_post(&target.thread_id, Post::new("Anonymous", format!("stale {}", i)))
            .await
            .unwrap();
    }

    let created = board.seed_thread_posts("paper-1", 0).await.unwrap();
    assert!(created > 0 && created < 12);

    let posts = store.list_posts(&target.thread_id).await.unwrap();
    let indices: Vec<u64> = posts.iter().map(|stored| stored.index).collect();
    assert_eq!(indices, (0..created as u64).collect::<Vec<_>>());
    assert!(posts.iter().all(|stored| !stored.post.body.starts_with("stale")));
    assert_eq!(store.count_posts(&target.thread_id).await.unwrap(), created as u64);

    let thread = store.get_thread("paper-1", 0).await.unwrap().unwrap();
    assert!(thread.enabled);

    // New posts continue right after the samples
    let receipt = board
        .submit(target.submission().with_body("fresh"))
        .await
        .unwrap();
    assert_eq!(receipt.sequence_index, created as u64);
}

#[tokio::test]
async fn test_seeding_stops_at_limit_and_closes() {
    let (store, board, target) = seeded_board(5).await;

    let created = board.seed_thread_posts("paper-1", 0).await.unwrap();
    assert_eq!(created, 5);
    assert_eq!(store.count_posts(&target.thread_id).await.unwrap(), 5);

    let thread = store.get_thread("paper-1", 0).await.unwrap().unwrap();
    assert!(!thread.enabled);

    let err = board
        .submit(target.submission().with_body("too late"))
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::ThreadFull { .. }));
}

#[tokio::test]
async fn test_seeding_never_reopens_closed_thread() {
    let (store, board, target) = seeded_board(20).await;
    let thread = store.get_thread("paper-1", 0).await.unwrap().unwrap();
    store.put_thread("paper-1", 0, thread.closed()).await.unwrap();

    board.seed_thread_posts("paper-1", 0).await.unwrap();

    let thread = store.get_thread("paper-1", 0).await.unwrap().unwrap();
    assert_eq!(thread.id, target.thread_id);
    assert!(!thread.enabled);
}

#[tokio::test]
async fn test_seeding_unknown_thread_is_not_found() {
    let (_store, board, _target) = seeded_board(20).await;

    let err = board.seed_thread_posts("paper-1", 7).await.unwrap_err();
    assert!(matches!(err, BoardError::ThreadNotFound { index: 7, .. }));
}
