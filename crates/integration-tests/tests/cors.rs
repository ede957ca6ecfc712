mod harness;

use grache_config::{AnyOrArray, CorsConfig};
use harness::backend::MockBackend;
use harness::config::ConfigBuilder;
use harness::server::TestServer;

const PING: &str = r#"{"query":"query { ping }"}"#;

fn header<'a>(resp: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn default_cors_mirrors_origin_with_credentials() {
    let backend = MockBackend::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&backend.url()).build()).await.unwrap();

    let resp = server
        .graphql(PING)
        .header("origin", "https://shop.example")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("https://shop.example"));
    assert_eq!(header(&resp, "access-control-allow-credentials"), Some("true"));
    assert!(
        header(&resp, "access-control-expose-headers")
            .is_some_and(|v| v.to_ascii_lowercase().contains("grache-cache-hit"))
    );
}

#[tokio::test]
async fn preflight_allows_control_headers() {
    let backend = MockBackend::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new(&backend.url()).build()).await.unwrap();

    let resp = server
        .client()
        .request(reqwest::Method::OPTIONS, server.graphql_url())
        .header("origin", "https://shop.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type, grache-expiration")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("https://shop.example"));
    let allowed = header(&resp, "access-control-allow-headers").unwrap().to_ascii_lowercase();
    assert!(allowed.contains("grache-expiration"));
    assert!(allowed.contains("grache-ignore-cookies"));
    assert!(header(&resp, "access-control-allow-methods").unwrap().contains("POST"));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn explicit_origin_list() {
    let backend = MockBackend::start().await.unwrap();
    let config = ConfigBuilder::new(&backend.url())
        .with_cors(CorsConfig {
            origins: AnyOrArray::List(vec!["https://shop.example".to_owned()]),
            credentials: false,
            ..CorsConfig::default()
        })
        .build();
    let server = TestServer::start(config).await.unwrap();

    let allowed = server
        .graphql(PING)
        .header("origin", "https://shop.example")
        .send()
        .await
        .unwrap();
    assert_eq!(header(&allowed, "access-control-allow-origin"), Some("https://shop.example"));
    assert!(header(&allowed, "access-control-allow-credentials").is_none());

    let denied = server
        .graphql(PING)
        .header("origin", "https://evil.example")
        .send()
        .await
        .unwrap();
    assert!(header(&denied, "access-control-allow-origin").is_none());
}

#[tokio::test]
async fn wildcard_without_credentials() {
    let backend = MockBackend::start().await.unwrap();
    let config = ConfigBuilder::new(&backend.url())
        .with_cors(CorsConfig {
            credentials: false,
            ..CorsConfig::default()
        })
        .build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .graphql(PING)
        .header("origin", "https://shop.example")
        .send()
        .await
        .unwrap();

    assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn cors_can_be_disabled() {
    let backend = MockBackend::start().await.unwrap();
    let config = ConfigBuilder::new(&backend.url())
        .with_cors(CorsConfig {
            enabled: false,
            ..CorsConfig::default()
        })
        .build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .graphql(PING)
        .header("origin", "https://shop.example")
        .send()
        .await
        .unwrap();

    assert!(header(&resp, "access-control-allow-origin").is_none());
}
