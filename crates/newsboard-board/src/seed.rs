use chrono::{DateTime, Duration, Utc};
use newsboard_types::Post;

pub(crate) const SAMPLE_TITLE: &str = "Oil shock sends petrol prices soaring";

const SAMPLE_CONVERSATION: &[(Option<&str>, &str)] = &[
    (None, "Filled up this morning and it was almost double last month."),
    (Some("tanuki"), "Same here. The station near the station raised prices twice in one day."),
    (None, "Is this the supply cut everyone was talking about?"),
    (Some("commuter88"), "Mostly, plus the weak yen. Imports got expensive all at once."),
    (None, "Buses are going to raise fares next, watch."),
    (Some("tanuki"), "Already announced for next month in my city."),
    (Some("kumo"), "Time to dust off the bicycle."),
    (None, "Supermarkets will follow. Delivery costs go straight into food prices."),
    (Some("commuter88"), "The government hinted at a fuel subsidy but nothing concrete yet."),
    (None, "A subsidy just delays it. Prices come back once it ends."),
];

/// Sample conversation ending at `now`, one minute between posts
pub(crate) fn sample_posts(anonymous_name: &str, now: DateTime<Utc>) -> Vec<Post> {
    let total = SAMPLE_CONVERSATION.len() as i64;
    SAMPLE_CONVERSATION
        .iter()
        .enumerate()
        .map(|(i, (author, body))| Post {
            author: author.unwrap_or(anonymous_name).to_string(),
            body: body.to_string(),
            created_at: now - Duration::minutes(total - 1 - i as i64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_posts_are_chronological() {
        let now = Utc::now();
        let posts = sample_posts("Nanashi", now);

        assert_eq!(posts.len(), SAMPLE_CONVERSATION.len());
        assert_eq!(posts[0].author, "Nanashi");
        assert_eq!(posts.last().unwrap().created_at, now);
        assert!(posts.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }
}
