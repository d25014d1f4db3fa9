use std::sync::Arc;

use newsboard_persist::{MemoryPersistenceClient, PersistenceClient};
use newsboard_types::{Newspaper, Post, Thread};

#[tokio::test]
async fn test_sequential_appends_are_gapless() {
    let client = MemoryPersistenceClient::new();

    for i in 0..6u64 {
        let index = client
            .append_post("thread-1", Post::new("Anonymous", format!("post {}", i)))
            .await
            .unwrap();
        assert_eq!(index, i);
    }

    let posts = client.list_posts("thread-1").await.unwrap();
    let indices: Vec<u64> = posts.iter().map(|p| p.index).collect();
    assert_eq!(indices, (0..6).collect::<Vec<_>>());
    assert_eq!(posts[3].post.body, "post 3");
    assert_eq!(client.count_posts("thread-1").await.unwrap(), 6);
    assert_eq!(client.count_posts("thread-2").await.unwrap(), 0);
}

#[tokio::test]
async fn test_concurrent_appends_get_distinct_slots() {
    let client = Arc::new(MemoryPersistenceClient::new());

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .append_post("busy", Post::new("Anonymous", format!("{}", i)))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut indices = Vec::new();
    for handle in handles {
        indices.push(handle.await.unwrap());
    }
    indices.sort_unstable();

    assert_eq!(indices, (0..32).collect::<Vec<u64>>());
    assert_eq!(client.list_posts("busy").await.unwrap().len(), 32);
}

#[tokio::test]
async fn test_put_post_overwrites_slot() {
    let client = MemoryPersistenceClient::new();
    client.put_post("t", 0, Post::new("a", "first")).await.unwrap();
    client.put_post("t", 0, Post::new("b", "second")).await.unwrap();

    let posts = client.list_posts("t").await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post.author, "b");
}

#[tokio::test]
async fn test_threads_round_trip_in_index_order() {
    let client = MemoryPersistenceClient::new();
    let first = Thread::open("Cats");
    let second = Thread::open("Dogs");

    client.put_thread("paper", 1, second.clone()).await.unwrap();
    client.put_thread("paper", 0, first.clone()).await.unwrap();

    assert_eq!(client.get_thread("paper", 0).await.unwrap(), Some(first.clone()));
    assert_eq!(client.get_thread("paper", 7).await.unwrap(), None);
    assert_eq!(client.get_thread("other", 0).await.unwrap(), None);

    let listed = client.list_threads("paper").await.unwrap();
    assert_eq!(listed, vec![(0, first.clone()), (1, second)]);

    client.put_thread("paper", 0, first.closed()).await.unwrap();
    let reloaded = client.get_thread("paper", 0).await.unwrap().unwrap();
    assert!(!reloaded.enabled);
}

#[tokio::test]
async fn test_newspapers_round_trip() {
    let client = MemoryPersistenceClient::new();
    let running = Newspaper::running();
    let published = Newspaper::published(chrono::Utc::now());

    client.put_newspaper(running.clone()).await.unwrap();
    client.put_newspaper(published.clone()).await.unwrap();

    assert_eq!(client.get_newspaper(&running.id).await.unwrap(), Some(running.clone()));
    assert_eq!(client.list_newspapers().await.unwrap().len(), 2);
    assert!(client.get_newspaper("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_posts_clears_one_thread() {
    let client = MemoryPersistenceClient::new();
    for body in ["a", "b", "c"] {
        client.append_post("cleared", Post::new("ann", body)).await.unwrap();
    }
    client.append_post("other", Post::new("bob", "stays")).await.unwrap();

    assert_eq!(client.delete_posts("cleared").await.unwrap(), 3);
    assert!(client.list_posts("cleared").await.unwrap().is_empty());
    assert_eq!(client.count_posts("other").await.unwrap(), 1);

    let index = client
        .append_post("cleared", Post::new("ann", "fresh"))
        .await
        .unwrap();
    assert_eq!(index, 0);
    assert_eq!(client.delete_posts("never-used").await.unwrap(), 0);
}
