use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thread admission and fan-out settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Posts a thread accepts before it closes
    pub post_limit: u64,
    /// Author recorded when a post carries no name
    pub anonymous_name: String,
    /// Outbound frames buffered per connection before it counts as lagging
    pub subscriber_buffer: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            post_limit: 20,
            anonymous_name: "Anonymous".to_string(),
            subscriber_buffer: 64,
        }
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post_limit(mut self, limit: u64) -> Self {
        self.post_limit = limit;
        self
    }

    pub fn with_anonymous_name(mut self, name: impl Into<String>) -> Self {
        self.anonymous_name = name.into();
        self
    }

    pub fn with_subscriber_buffer(mut self, buffer: usize) -> Self {
        self.subscriber_buffer = buffer;
        self
    }
}

/// How newspaper editions are generated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditionConfig {
    pub threads_per_edition: usize,
    /// Candidate headlines; each edition draws a shuffled sample
    pub titles: Vec<String>,
}

impl Default for EditionConfig {
    fn default() -> Self {
        Self {
            threads_per_edition: 5,
            titles: DEFAULT_TITLES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl EditionConfig {
    pub fn with_threads_per_edition(mut self, count: usize) -> Self {
        self.threads_per_edition = count;
        self
    }

    pub fn with_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.titles = titles.into_iter().map(Into::into).collect();
        self
    }
}

const DEFAULT_TITLES: &[&str] = &[
    "Oil shock sends petrol prices soaring",
    "City council approves late-night train service",
    "Record heatwave grips the capital",
    "Local bakery wins national bread award",
    "Stock market closes at all-time high",
    "New smartphone sells out in minutes",
    "Rail strike enters third day",
    "High school team reaches national final",
    "Typhoon expected to make landfall this weekend",
    "Museum unveils long-lost painting",
    "Rice harvest hits ten-year low",
    "Startup promises flying taxis by next year",
];

/// AI summary generation and its retry queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Approximate article length requested from the model, in characters
    pub target_chars: usize,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            target_chars: 300,
            max_attempts: 3,
            retry_backoff: Duration::from_secs(2),
        }
    }
}

impl SummaryConfig {
    pub fn with_target_chars(mut self, chars: usize) -> Self {
        self.target_chars = chars;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let board = BoardConfig::default();
        assert_eq!(board.post_limit, 20);
        assert_eq!(board.anonymous_name, "Anonymous");

        let edition = EditionConfig::default();
        assert!(edition.titles.len() >= edition.threads_per_edition);
    }

    #[test]
    fn test_builders() {
        let board = BoardConfig::new().with_post_limit(5).with_anonymous_name("Nanashi");
        assert_eq!(board.post_limit, 5);
        assert_eq!(board.anonymous_name, "Nanashi");

        let edition = EditionConfig::default()
            .with_threads_per_edition(2)
            .with_titles(["a", "b", "c"]);
        assert_eq!(edition.threads_per_edition, 2);
        assert_eq!(edition.titles, vec!["a", "b", "c"]);
    }
}
