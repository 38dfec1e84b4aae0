//! Robots.txt behavior: disallow verdicts, per-authority caching, sitemap
//! seeding, and the cross-domain redirect refusal.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kumo::{CrawlConfig, CrawlError, CrawlHandle, CrawlListener, Crawler, ItemStatus, QueueItem};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RobotsLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl RobotsLog {
    fn snapshot(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl CrawlListener for RobotsLog {
    async fn on_queue_add(&mut self, _handle: &CrawlHandle, item: &QueueItem) {
        self.push(format!("queueadd {}", item.path));
    }

    async fn on_fetch_disallowed(&mut self, _handle: &CrawlHandle, url: &Url) {
        self.push(format!("fetchdisallowed {}", url.path()));
    }

    async fn on_robots_txt_error(&mut self, _handle: &CrawlHandle, error: &CrawlError) {
        self.push(format!("robotstxterror {}", error));
    }
}

fn fast_config() -> CrawlConfig {
    CrawlConfig {
        interval_ms: 2,
        ..CrawlConfig::default()
    }
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_disallowed_path_is_never_fetched() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private").await;
    mount_html(
        &server,
        "/",
        r#"<a href="/private/x">p</a><a href="/public">ok</a>"#,
    )
    .await;
    mount_html(&server, "/public", "fine").await;

    Mock::given(method("GET"))
        .and(path("/private/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let log = RobotsLog::default();
    let mut crawler = Crawler::builder(format!("{}/", server.uri()))
        .config(fast_config())
        .listener(log.clone())
        .build();
    crawler.run().await.expect("crawl failed");

    let entries = log.snapshot();
    assert!(
        entries.contains(&"fetchdisallowed /private/x".to_string()),
        "entries: {:?}",
        entries
    );

    let private = Url::parse(&format!("{}/private/x", server.uri())).unwrap();
    let item = crawler.queue().get_by_url(&private).expect("item exists");
    assert_eq!(item.status, ItemStatus::NotFound);
    assert_eq!(crawler.queue().count_status(ItemStatus::Downloaded), 2);
}

#[tokio::test]
async fn test_disabling_robots_skips_the_fetch_entirely() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&server)
        .await;
    mount_html(&server, "/", r#"<a href="/anything">a</a>"#).await;
    mount_html(&server, "/anything", "reachable").await;

    let config = CrawlConfig {
        respect_robots_txt: false,
        ..fast_config()
    };
    let mut crawler = Crawler::builder(format!("{}/", server.uri()))
        .config(config)
        .build();
    crawler.run().await.expect("crawl failed");

    assert_eq!(crawler.queue().count_status(ItemStatus::Downloaded), 2);
}

#[tokio::test]
async fn test_robots_is_fetched_once_per_authority() {
    let server = MockServer::start().await;
    // The mount carries expect(1); crawling four pages must not refetch it.
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        r#"<a href="/one">1</a><a href="/two">2</a><a href="/three">3</a>"#,
    )
    .await;
    mount_html(&server, "/one", "1").await;
    mount_html(&server, "/two", "2").await;
    mount_html(&server, "/three", "3").await;

    let mut crawler = Crawler::builder(format!("{}/", server.uri()))
        .config(fast_config())
        .build();
    crawler.run().await.expect("crawl failed");

    assert_eq!(crawler.queue().count_status(ItemStatus::Downloaded), 4);
}

#[tokio::test]
async fn test_robots_cache_is_per_port() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;

    mount_robots(&server_a, "User-agent: *\nAllow: /").await;
    mount_robots(&server_b, "User-agent: *\nDisallow: /blocked").await;

    mount_html(
        &server_a,
        "/",
        &format!(
            r#"<a href="{b}/blocked">b</a><a href="{b}/open">o</a>"#,
            b = server_b.uri()
        ),
    )
    .await;
    mount_html(&server_b, "/open", "open").await;

    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(200).set_body_string("blocked"))
        .expect(0)
        .mount(&server_b)
        .await;

    let log = RobotsLog::default();
    let mut crawler = Crawler::builder(format!("{}/", server_a.uri()))
        .config(fast_config())
        .listener(log.clone())
        .build();
    crawler.run().await.expect("crawl failed");

    let entries = log.snapshot();
    assert!(
        entries.contains(&"fetchdisallowed /blocked".to_string()),
        "entries: {:?}",
        entries
    );
    assert_eq!(crawler.queue().count_status(ItemStatus::Downloaded), 2);
}

#[tokio::test]
async fn test_sitemap_entries_are_queued_before_anything_else() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        &format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml",
            server.uri()
        ),
    )
    .await;
    mount_html(&server, "/", r#"<a href="/linked">l</a>"#).await;
    mount_html(&server, "/linked", "via anchor").await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<?xml version="1.0"?><urlset></urlset>"#)
                .insert_header("content-type", "application/xml"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let log = RobotsLog::default();
    let mut crawler = Crawler::builder(format!("{}/", server.uri()))
        .config(fast_config())
        .listener(log.clone())
        .build();
    crawler.run().await.expect("crawl failed");

    let entries = log.snapshot();
    let adds: Vec<&str> = entries
        .iter()
        .filter(|e| e.starts_with("queueadd"))
        .map(String::as_str)
        .collect();
    assert_eq!(adds.first().copied(), Some("queueadd /sitemap.xml"));
    assert!(adds.contains(&"queueadd /linked"));

    let sitemap = Url::parse(&format!("{}/sitemap.xml", server.uri())).unwrap();
    let item = crawler.queue().get_by_url(&sitemap).expect("sitemap queued");
    assert_eq!(item.depth, 0);
    assert!(item.referrer.is_none());
}

#[tokio::test]
async fn test_cross_domain_robots_redirect_blocks_the_authority() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", "http://robots-vault.example/robots.txt"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("never served"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(ResponseTemplate::new(200).set_body_string("never served"))
        .expect(0)
        .mount(&server)
        .await;

    let log = RobotsLog::default();
    let mut crawler = Crawler::builder(format!("{}/", server.uri()))
        .config(fast_config())
        .listener(log.clone())
        .build();

    // A second URL on the same authority must fail from the cached
    // verdict without another robots.txt request.
    let other = Url::parse(&format!("{}/other", server.uri())).unwrap();
    crawler.handle().enqueue(other);

    crawler.run().await.expect("crawl failed");

    let entries = log.snapshot();
    let errors: Vec<&String> = entries
        .iter()
        .filter(|e| e.starts_with("robotstxterror"))
        .collect();
    assert_eq!(errors.len(), 2, "entries: {:?}", entries);
    assert!(errors[0].contains("redirected to a disallowed domain"));
    assert_eq!(crawler.queue().count_status(ItemStatus::Failed), 2);
    assert_eq!(crawler.queue().count_status(ItemStatus::Downloaded), 0);
}

#[tokio::test]
async fn test_robots_request_carries_the_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .and(header("user-agent", "kumo-test/9.9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/", "hello").await;

    let config = CrawlConfig {
        user_agent: "kumo-test/9.9".to_string(),
        ..fast_config()
    };
    let mut crawler = Crawler::builder(format!("{}/", server.uri()))
        .config(config)
        .build();
    crawler.run().await.expect("crawl failed");

    assert_eq!(crawler.queue().count_status(ItemStatus::Downloaded), 1);
}
