pub mod config;
pub mod gemini;
pub mod prompt;
pub mod traits;

pub use config::GeminiConfig;
pub use gemini::GeminiClient;
pub use prompt::{SummaryPrompt, SUMMARY_PROMPT_TEMPLATE};
pub use traits::{GenerateRequest, GenerateResponse, TextGenerator};
