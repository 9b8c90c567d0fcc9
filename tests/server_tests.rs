// Integration tests for the web form
//
// The router is served on an ephemeral local port and driven with reqwest,
// with the pipeline stages stubbed out.

use async_trait::async_trait;
use icebreaker::server;
use icebreaker::{
    FetchMode, IceBreaker, IceBreakerBuilder, ProfileRecord, ProfileSource, ProfileUrl, Result,
    Summary, SummaryService, UrlResolver,
};
use std::net::SocketAddr;
use std::sync::Arc;

/// Finds everyone except names containing "Unknown"
struct NameResolver;

#[async_trait]
impl UrlResolver for NameResolver {
    async fn resolve(&self, name: &str) -> Result<ProfileUrl> {
        if name.contains("Unknown") {
            return Ok(ProfileUrl::NotFound);
        }
        let slug = name.to_lowercase().replace(' ', "-");
        Ok(ProfileUrl::Found(format!("https://www.linkedin.com/in/{}/", slug)))
    }
}

struct StaticSource;

#[async_trait]
impl ProfileSource for StaticSource {
    async fn fetch(&self, _url: &str, _mode: FetchMode) -> Result<ProfileRecord> {
        Ok(ProfileRecord {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            headline: Some("Analyst & <b>programmer</b>".to_string()),
            ..ProfileRecord::default()
        })
    }
}

struct HeadlineSummaries;

#[async_trait]
impl SummaryService for HeadlineSummaries {
    async fn try_generate(&self, record: &ProfileRecord) -> Result<Summary> {
        Ok(Summary::new(
            record.headline.clone().unwrap_or_default(),
            vec![
                "Wrote the first published algorithm".to_string(),
                "Worked with Charles Babbage".to_string(),
            ],
        ))
    }
}

fn icebreaker() -> IceBreaker {
    IceBreakerBuilder::new()
        .with_resolver(Arc::new(NameResolver))
        .with_profile_source(Arc::new(StaticSource))
        .with_summary_service(Arc::new(HeadlineSummaries))
        .build()
        .unwrap()
}

async fn spawn_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(Arc::new(icebreaker()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn get_renders_empty_form() {
    let addr = spawn_server().await;

    let resp = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert!(resp.status().is_success());

    let body = resp.text().await.unwrap();
    assert!(body.contains("name=\"name\""));
    assert!(!body.contains(server::EMPTY_RESULT_PLACEHOLDER));
    assert!(!body.contains("No LinkedIn data found."));
}

#[tokio::test]
async fn post_renders_escaped_summary_and_facts() {
    let addr = spawn_server().await;

    let body = reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .form(&[("name", "Ada Lovelace")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Analyst &amp; &lt;b&gt;programmer&lt;/b&gt;"));
    assert!(body.contains("<li>Worked with Charles Babbage</li>"));
}

#[tokio::test]
async fn post_for_unknown_person_renders_no_data() {
    let addr = spawn_server().await;

    let body = reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .form(&[("name", "Totally Unknown Person XYZ123")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("No LinkedIn data found."));
}

#[tokio::test]
async fn post_without_name_is_handled() {
    let addr = spawn_server().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .form(&[("other", "field")])
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    assert!(resp.text().await.unwrap().contains("No LinkedIn data found."));
}
