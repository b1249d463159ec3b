//! Client integration tests against a minimal local HTTP fixture.
//!
//! Each test serves canned responses from a loopback listener, so the
//! published-only filter, retry loop, quarantine, and fallback policies
//! are exercised over a real socket without touching the live API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use blogform_client::{ContentClient, ContentError, FallbackPolicy, RetryPolicy};

/// Serve one canned response per incoming connection, in order, counting
/// requests. The listener closes after the queue is drained.
async fn spawn_fixture(responses: Vec<(u16, String)>) -> Result<(String, Arc<AtomicUsize>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);

            // Drain the request headers before answering.
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            loop {
                match stream.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    Err(_) => return,
                }
            }

            let reason = match status {
                200 => "OK",
                500 => "Internal Server Error",
                503 => "Service Unavailable",
                _ => "Status",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    Ok((format!("http://{addr}/content.json"), hits))
}

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(20),
    }
}

fn collection_body() -> String {
    json!([
        {
            "id": "1",
            "slug": "deep-learning-basics",
            "title": "Deep Learning Basics",
            "metaDescription": "An introduction to neural networks.",
            "content": "Neural networks underpin modern AI systems.",
            "categories": ["AI"],
            "tags": ["ai", "ml"],
            "status": "published",
            "publishDate": "2024-03-10T09:00:00Z"
        },
        {
            "id": "2",
            "slug": "unfinished-draft",
            "title": "Unfinished Draft",
            "status": "draft",
            "publishDate": "2024-03-11T09:00:00Z"
        },
        {
            "id": "3",
            "slug": "cooking-pasta",
            "title": "Cooking Pasta",
            "metaDescription": "Weeknight pasta that actually works.",
            "content": "Salt the water like the sea.",
            "categories": ["Lifestyle"],
            "tags": ["food"],
            "status": "published",
            "publishDate": "2024-03-08T09:00:00Z"
        }
    ])
    .to_string()
}

#[tokio::test]
async fn fetch_published_filters_drafts_and_keeps_source_order() -> Result<()> {
    let (url, _) = spawn_fixture(vec![(200, collection_body())]).await?;
    let client = ContentClient::new(&url).with_retry(fast_retry(3));

    let posts = client.fetch_published().await?;
    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["deep-learning-basics", "cooking-pasta"]);
    Ok(())
}

#[tokio::test]
async fn retry_recovers_after_two_transient_failures() -> Result<()> {
    let (url, hits) = spawn_fixture(vec![
        (500, "boom".to_string()),
        (503, "still down".to_string()),
        (200, collection_body()),
    ])
    .await?;
    let client = ContentClient::new(&url).with_retry(fast_retry(3));

    let posts = client.fetch_published().await?;
    assert_eq!(posts.len(), 2);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn exhausted_retries_surface_a_distinct_error() -> Result<()> {
    let (url, hits) = spawn_fixture(vec![
        (500, "boom".to_string()),
        (500, "boom".to_string()),
        (500, "boom".to_string()),
    ])
    .await?;
    let client = ContentClient::new(&url).with_retry(fast_retry(3));

    match client.fetch_published().await {
        Err(ContentError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn slug_lookup_is_definite_found_or_not_found() -> Result<()> {
    let (url, _) = spawn_fixture(vec![(200, collection_body()), (200, collection_body())]).await?;
    let client = ContentClient::new(&url).with_retry(fast_retry(1));

    let found = client.content_by_slug("cooking-pasta").await;
    assert_eq!(found.map(|p| p.id), Some("3".to_string()));

    // Draft slugs are invisible, not an error.
    let hidden = client.content_by_slug("unfinished-draft").await;
    assert!(hidden.is_none());
    Ok(())
}

#[tokio::test]
async fn category_match_is_exact_and_case_sensitive() -> Result<()> {
    let (url, _) = spawn_fixture(vec![(200, collection_body()), (200, collection_body())]).await?;
    let client = ContentClient::new(&url).with_retry(fast_retry(1));

    let ai = client.posts_by_category("AI").await;
    assert_eq!(ai.len(), 1);
    assert_eq!(ai[0].slug, "deep-learning-basics");

    assert!(client.posts_by_category("ai").await.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_records_are_dropped_over_the_wire() -> Result<()> {
    let body = json!([
        {
            "id": "1",
            "slug": "valid-post",
            "title": "Valid Post",
            "status": "published",
            "publishDate": "2024-03-10T09:00:00Z"
        },
        {"garbage": true}
    ])
    .to_string();
    let (url, _) = spawn_fixture(vec![(200, body)]).await?;
    let client = ContentClient::new(&url).with_retry(fast_retry(1));

    let posts = client.fetch_published().await?;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "valid-post");
    Ok(())
}

#[tokio::test]
async fn non_array_body_is_a_terminal_parse_failure() -> Result<()> {
    let body = json!({"error": "maintenance"}).to_string();
    let (url, _) = spawn_fixture(vec![(200, body)]).await?;
    let client = ContentClient::new(&url).with_retry(fast_retry(1));

    match client.fetch_published().await {
        Err(ContentError::RetriesExhausted { last, .. }) => {
            assert!(last.contains("error") || last.contains("decod") || last.contains("Parse"));
        }
        other => panic!("expected terminal failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_degrades_per_policy() -> Result<()> {
    // Grab a port and release it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}/content.json", listener.local_addr()?);
    drop(listener);

    let empty = ContentClient::new(&url).with_retry(fast_retry(1));
    assert!(empty.all_content().await.is_empty());

    let sampled = ContentClient::new(&url)
        .with_retry(fast_retry(1))
        .with_fallback(FallbackPolicy::Sample);
    let posts = sampled.all_content().await;
    assert!(!posts.is_empty());

    // Slug lookup against the fallback set still yields a definite answer.
    let slug = posts[0].slug.clone();
    assert!(sampled.content_by_slug(&slug).await.is_some());
    assert!(sampled.content_by_slug("no-such-slug").await.is_none());
    Ok(())
}
