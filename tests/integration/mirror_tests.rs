use catalog_mirror::config::{Config, FetchConfig, MirrorConfig};
use catalog_mirror::{Mirror, Record, RecordFilter, SearchField, SearchQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing the primary mirror at `base_url`
fn create_test_config(base_url: &str) -> Config {
    Config {
        fetch: FetchConfig {
            timeout_secs: 5,
            max_retries: 2,
            backoff_factor: 0.0,
            ..FetchConfig::default()
        },
        mirror: MirrorConfig::with_base_url(base_url),
    }
}

fn result_page() -> String {
    r#"<html><body>
    <ul class="nav nav-tabs">
        <li><a href="/edition.php?id=1">Files</a></li>
        <li><a href="/json.php?object=e&ids=1">JSON</a></li>
    </ul>
    <table id="search"><tr><td>search form</td></tr></table>
    <table id="tablelibgen">
        <thead><tr><th>Cover</th><th>Title</th></tr></thead>
        <tbody>
        <tr>
            <td><img src="/covers/x_small.jpg"></td>
            <td><b>Series</b> <a href="/edition.php?id=1">Book One</a>
                <a href="/edition.php?id=1">9780131103627</a>
                <span class="badge badge-secondary">l 123</span></td>
            <td>A. Author</td>
            <td>Pub Co</td>
            <td>2020</td>
            <td>English</td>
            <td>300</td>
            <td>2MB</td>
            <td>PDF</td>
            <td><a href="/ads.php?md5=abc">[1]</a><a href="http://library.lol/main/ABC">[2]</a></td>
        </tr>
        <tr>
            <td></td>
            <td><a href="/edition.php?id=2">Second Book</a></td>
            <td>B. Writer</td>
            <td>Other Press</td>
            <td>1999</td>
            <td>German</td>
            <td>120</td>
            <td>1MB</td>
            <td>EPUB</td>
            <td></td>
        </tr>
        </tbody>
    </table>
    <table id="paginator"><tr><td>1</td></tr></table>
    </body></html>"#
        .to_string()
}

/// Plain data pulled out of the blocking closure
struct SearchOutcome {
    records: Vec<Record>,
    json_link: Option<String>,
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_and_extract_metadata() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("req", "rust book"))
        .and(query_param("columns[]", "t"))
        .and(query_param("res", "25"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(result_page())
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let outcome = tokio::task::spawn_blocking(move || {
        let mirror = Mirror::new(config).unwrap();
        let query = SearchQuery::new("rust book")
            .with_fields([SearchField::Title])
            .with_max_results(25);
        let page = mirror.search(&query);
        SearchOutcome {
            records: mirror.get_metadata(page.as_ref(), 10).unwrap_or_default(),
            json_link: mirror.get_json(page.as_ref()),
        }
    })
    .await
    .unwrap();

    assert_eq!(outcome.records.len(), 2);

    let first = &outcome.records[0];
    assert_eq!(first.title, "Series - Book One");
    assert_eq!(first.isbn, vec!["9780131103627"]);
    assert_eq!(first.id, "l123");
    assert_eq!(first.thumbnail, format!("{}/covers/x.jpg", base_url));
    assert_eq!(
        first.content_url,
        vec![
            format!("{}/ads.php?md5=abc", base_url),
            "http://library.lol/main/ABC".to_string(),
        ]
    );

    let second = &outcome.records[1];
    assert_eq!(second.title, "Second Book");
    assert_eq!(second.thumbnail, "");
    assert!(second.content_url.is_empty());

    assert_eq!(
        outcome.json_link,
        Some(format!("{}/json.php?object=e&ids=1", base_url))
    );

    let german = Mirror::filtered(&outcome.records, &RecordFilter::new().language("german"));
    assert_eq!(german.len(), 1);
    assert_eq!(german[0].author, "B. Writer");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_max_entries_caps_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let titles = tokio::task::spawn_blocking(move || {
        let mirror = Mirror::new(config).unwrap();
        mirror
            .search_metadata(&SearchQuery::new("anything"), 1)
            .into_iter()
            .map(|record| record.title)
            .collect::<Vec<_>>()
    })
    .await
    .unwrap();

    assert_eq!(titles, vec!["Series - Book One"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_search_yields_no_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (page_missing, metadata) = tokio::task::spawn_blocking(move || {
        let mirror = Mirror::new(config).unwrap();
        let page = mirror.search(&SearchQuery::new("rust"));
        (page.is_none(), mirror.get_metadata(page.as_ref(), 10))
    })
    .await
    .unwrap();

    assert!(page_missing);
    assert_eq!(metadata, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_results_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><table></table><p>Nothing found</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let metadata = tokio::task::spawn_blocking(move || {
        let mirror = Mirror::new(config).unwrap();
        let page = mirror.search(&SearchQuery::new("nothing"));
        mirror.get_metadata(page.as_ref(), 10)
    })
    .await
    .unwrap();

    assert_eq!(metadata, Some(Vec::new()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_download_on_primary_mirror() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/ads.php"))
        .and(query_param("md5", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h2>Book One</h2>
            <table><tr><td><a href="get.php?md5=abc&key=K1">GET</a></td></tr></table>
            <table><tr><td><a href="/other">Other</a></td></tr></table>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let download_page = format!("{}/ads.php?md5=abc", base_url);
    let link = tokio::task::spawn_blocking(move || {
        let mirror = Mirror::new(config).unwrap();
        mirror.resolve_download(&download_page)
    })
    .await
    .unwrap();

    assert_eq!(link, Some(format!("{}/get.php?md5=abc&key=K1", base_url)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_download_without_table() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>expired</p>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let download_page = format!("{}/ads.php?md5=abc", mock_server.uri());
    let link = tokio::task::spawn_blocking(move || {
        let mirror = Mirror::new(config).unwrap();
        mirror.resolve_download(&download_page)
    })
    .await
    .unwrap();

    assert_eq!(link, None);
}
