use std::sync::Arc;

use chrono::{Duration, Utc};
use newsboard_persist::PersistenceClient;
use newsboard_types::{EditionConfig, Newspaper, Thread};
use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::error::{BoardError, Result};

/// A newspaper together with its threads, ordered by index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edition {
    pub newspaper: Newspaper,
    pub threads: Vec<(u32, Thread)>,
}

/// Creates, lists and publishes newspaper editions
pub struct EditionService {
    store: Arc<dyn PersistenceClient>,
    config: EditionConfig,
    creating: Mutex<()>,
}

impl EditionService {
    pub fn new(store: Arc<dyn PersistenceClient>, config: EditionConfig) -> Self {
        Self {
            store,
            config,
            creating: Mutex::new(()),
        }
    }

    /// The edition currently collecting posts, created on first use
    pub async fn current_edition(&self) -> Result<Edition> {
        let _creating = self.creating.lock().await;

        let running = self
            .store
            .list_newspapers()
            .await?
            .into_iter()
            .find(|newspaper| !newspaper.enabled);

        match running {
            Some(newspaper) => {
                let threads = self.store.list_threads(&newspaper.id).await?;
                Ok(Edition { newspaper, threads })
            }
            None => self.create_edition().await,
        }
    }

    async fn create_edition(&self) -> Result<Edition> {
        let newspaper = Newspaper::running();
        let mut threads = Vec::new();

        for (index, title) in (0u32..).zip(self.draw_titles()) {
            let thread = Thread::open(title);
            self.store
                .put_thread(&newspaper.id, index, thread.clone())
                .await?;
            threads.push((index, thread));
        }
        // Threads first, so the edition is complete once it becomes visible
        self.store.put_newspaper(newspaper.clone()).await?;

        tracing::info!(
            newspaper_id = %newspaper.id,
            threads = threads.len(),
            "Created new edition"
        );

        Ok(Edition { newspaper, threads })
    }

    fn draw_titles(&self) -> Vec<String> {
        let mut titles = self.config.titles.clone();
        titles.shuffle(&mut rand::rng());
        titles.truncate(self.config.threads_per_edition);
        titles
    }

    /// Published editions, newest first
    pub async fn published_editions(&self) -> Result<Vec<Newspaper>> {
        let mut published: Vec<Newspaper> = self
            .store
            .list_newspapers()
            .await?
            .into_iter()
            .filter(Newspaper::is_published)
            .collect();
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(published)
    }

    pub async fn threads(&self, newspaper_id: &str) -> Result<Vec<(u32, Thread)>> {
        self.newspaper(newspaper_id).await?;
        Ok(self.store.list_threads(newspaper_id).await?)
    }

    pub async fn newspaper(&self, newspaper_id: &str) -> Result<Newspaper> {
        self.store
            .get_newspaper(newspaper_id)
            .await?
            .ok_or_else(|| BoardError::NewspaperNotFound(newspaper_id.to_string()))
    }

    /// Publish the edition once every thread carries a summary
    ///
    /// Returns whether this call published it.
    pub async fn publish_if_complete(&self, newspaper_id: &str) -> Result<bool> {
        let newspaper = self.newspaper(newspaper_id).await?;
        if newspaper.is_published() {
            return Ok(false);
        }

        let threads = self.store.list_threads(newspaper_id).await?;
        let complete =
            !threads.is_empty() && threads.iter().all(|(_, thread)| thread.summary.is_some());
        if !complete {
            return Ok(false);
        }

        self.store.put_newspaper(newspaper.publish(Utc::now())).await?;
        tracing::info!(newspaper_id = %newspaper_id, "Edition published");
        Ok(true)
    }

    /// Create `count` published editions one minute apart, newest now
    pub async fn seed_published_editions(&self, count: usize) -> Result<Vec<Newspaper>> {
        let now = Utc::now();
        let mut created = Vec::with_capacity(count);

        for offset in 0..count {
            let newspaper = Newspaper::published(now - Duration::minutes(offset as i64));
            self.store.put_newspaper(newspaper.clone()).await?;
            created.push(newspaper);
        }

        tracing::info!(count, "Seeded published editions");
        Ok(created)
    }
}
