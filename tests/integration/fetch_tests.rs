use catalog_mirror::fetch::{fetch, Fetcher, RetryPolicy};
use catalog_mirror::MirrorError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UA: &str = "catalog-mirror-tests/1.0";

/// A policy that retries immediately
fn fast_policy() -> RetryPolicy {
    RetryPolicy::default()
        .with_timeout(Duration::from_secs(5))
        .with_backoff_factor(0.0)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transient_status_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><h1>Recovered</h1></body></html>")
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/flaky", mock_server.uri());
    let heading = tokio::task::spawn_blocking(move || {
        let fetcher = Fetcher::new(fast_policy(), UA).unwrap();
        let document = fetcher.fetch(&url)?;
        let selector = scraper::Selector::parse("h1").unwrap();
        let heading = document
            .select_first(&selector)
            .map(|h1| h1.text().collect::<String>());
        heading
    })
    .await
    .unwrap();

    assert_eq!(heading.as_deref(), Some("Recovered"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_persistent_server_error_exhausts_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/broken", mock_server.uri());
    let fetched = tokio::task::spawn_blocking(move || {
        let fetcher = Fetcher::new(fast_policy(), UA).unwrap();
        fetcher.fetch(&url).is_some()
    })
    .await
    .unwrap();

    assert!(!fetched);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let status = tokio::task::spawn_blocking(move || {
        let fetcher = Fetcher::new(fast_policy(), UA).unwrap();
        match fetcher.try_fetch(&url) {
            Err(MirrorError::Status { status, .. }) => Some(status),
            _ => None,
        }
    })
    .await
    .unwrap();

    assert_eq!(status, Some(404));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_custom_retry_statuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/teapot", mock_server.uri());
    let fetched = tokio::task::spawn_blocking(move || {
        let policy = fast_policy().with_max_retries(2).with_retry_statuses([418]);
        let fetcher = Fetcher::new(policy, UA).unwrap();
        fetcher.fetch(&url).is_some()
    })
    .await
    .unwrap();

    assert!(!fetched);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_refused_yields_none() {
    // Bind then drop a listener so its port is very likely closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let url = format!("http://127.0.0.1:{}/gone", port);
    let fetched = tokio::task::spawn_blocking(move || {
        let fetcher = Fetcher::new(fast_policy().with_max_retries(2), UA).unwrap();
        fetcher.fetch(&url).is_some()
    })
    .await
    .unwrap();

    assert!(!fetched);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_records_final_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/page", mock_server.uri());
    let expected = url.clone();
    let fetched_url = tokio::task::spawn_blocking(move || {
        let fetcher = Fetcher::new(fast_policy(), UA).unwrap();
        fetcher.fetch(&url).map(|doc| doc.url().to_string())
    })
    .await
    .unwrap();

    assert_eq!(fetched_url, Some(expected));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeouts_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>too late</p>")
                .set_delay(Duration::from_secs(3)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/slow", mock_server.uri());
    let timed_out = tokio::task::spawn_blocking(move || {
        let policy = fast_policy().with_timeout(Duration::from_secs(1));
        let fetcher = Fetcher::new(policy, UA).unwrap();
        matches!(fetcher.try_fetch(&url), Err(MirrorError::Timeout { .. }))
    })
    .await
    .unwrap();

    assert!(timed_out);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_free_fetch_recovers_after_transient_statuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Ready</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/busy", mock_server.uri());
    let expected = url.clone();
    let fetched_url = tokio::task::spawn_blocking(move || {
        fetch(&url, &fast_policy()).map(|doc| doc.url().to_string())
    })
    .await
    .unwrap();

    assert_eq!(fetched_url, Some(expected));
}
