use std::sync::Arc;

use newsboard_board::{EditionService, SummaryQueue, SummaryService, ThreadBoard, ThreadLocks};
use newsboard_llm::TextGenerator;
use newsboard_persist::PersistenceClient;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};

/// Shared application state passed to all handlers
///
/// Summaries are optional: without a text generator the summary routes
/// answer 503 and closed threads are not summarized automatically.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn PersistenceClient>,
    pub board: Arc<ThreadBoard>,
    pub editions: Arc<EditionService>,
    pub summaries: Option<Arc<SummaryService>>,
    pub summary_queue: Option<SummaryQueue>,
}

impl AppState {
    /// Wire the services together; spawns the summary worker when a
    /// generator is given, so it must run inside a Tokio runtime
    pub fn new(
        config: Config,
        store: Arc<dyn PersistenceClient>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let anonymous_name = config.board.anonymous_name.clone();

        let editions = Arc::new(EditionService::new(
            Arc::clone(&store),
            config.edition.clone(),
        ));
        // Summaries and posts share one slot per thread
        let locks = ThreadLocks::new();

        let summaries = generator.map(|generator| {
            Arc::new(
                SummaryService::new(
                    Arc::clone(&store),
                    generator,
                    Arc::clone(&editions),
                    locks.clone(),
                    config.summary_config(),
                )
                .with_anonymous_name(&anonymous_name),
            )
        });

        let summary_queue = summaries.as_ref().map(|service| {
            let (queue, _worker) = SummaryQueue::spawn(Arc::clone(service));
            queue
        });

        let mut board =
            ThreadBoard::new(Arc::clone(&store), config.board.clone()).with_thread_locks(locks);
        if let Some(queue) = &summary_queue {
            board = board.with_summary_queue(queue.clone());
        }

        Self {
            config: Arc::new(config),
            store,
            board: Arc::new(board),
            editions,
            summaries,
            summary_queue,
        }
    }

    pub fn summaries(&self) -> ApiResult<&Arc<SummaryService>> {
        self.summaries
            .as_ref()
            .ok_or(ApiError::NotConfigured("GOOGLE_API_KEY"))
    }

    pub fn summary_queue(&self) -> ApiResult<&SummaryQueue> {
        self.summary_queue
            .as_ref()
            .ok_or(ApiError::NotConfigured("GOOGLE_API_KEY"))
    }
}
