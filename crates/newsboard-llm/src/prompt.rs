/// Summary instructions; placeholders are filled by [`SummaryPrompt::render`]
pub const SUMMARY_PROMPT_TEMPLATE: &str = "\
Summarize the conversation in the thread below in about {chars} characters (within 10 characters either way).
Write it like a newspaper article.
Do not include a headline, only the article body.
Do not include line breaks in the article.
\"{anonymous}\" is the name used for posters who did not give a name.

## Headline: {title}
{posts}";

/// Inputs for a thread summary prompt
#[derive(Debug, Clone)]
pub struct SummaryPrompt<'a> {
    pub title: &'a str,
    /// One `author: body` line per post, in thread order
    pub transcript: &'a [String],
    pub target_chars: usize,
    pub anonymous_name: &'a str,
}

impl SummaryPrompt<'_> {
    pub fn render(&self) -> String {
        let mut posts = self.transcript.join("\n");
        if !posts.is_empty() {
            posts.push('\n');
        }

        SUMMARY_PROMPT_TEMPLATE
            .replace("{chars}", &self.target_chars.to_string())
            .replace("{anonymous}", self.anonymous_name)
            .replace("{title}", self.title)
            .replace("{posts}", &posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_every_placeholder() {
        let transcript = vec!["alice: hi".to_string(), "Anonymous: hello".to_string()];
        let prompt = SummaryPrompt {
            title: "Cats",
            transcript: &transcript,
            target_chars: 300,
            anonymous_name: "Anonymous",
        }
        .render();

        assert!(prompt.contains("about 300 characters"));
        assert!(prompt.contains("## Headline: Cats\nalice: hi\nAnonymous: hello\n"));
        assert!(prompt.contains("\"Anonymous\" is the name"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_render_without_posts() {
        let prompt = SummaryPrompt {
            title: "Empty",
            transcript: &[],
            target_chars: 100,
            anonymous_name: "Nobody",
        }
        .render();

        assert!(prompt.ends_with("## Headline: Empty\n"));
    }
}
