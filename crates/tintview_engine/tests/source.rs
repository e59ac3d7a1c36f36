use std::time::Duration;

use serde_json::json;
use tintview_engine::{FailureKind, ImageSource, ReqwestImageSource, SourceSettings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> ReqwestImageSource {
    ReqwestImageSource::new(SourceSettings {
        endpoint: format!("{}/image", server.uri()),
        ..SourceSettings::default()
    })
}

async fn serve(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn returns_url_from_json_body() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn.example.org/cat.png"})),
    )
    .await;

    let url = source_for(&server).fetch_image_url().await.expect("fetch ok");
    assert_eq!(url, "https://cdn.example.org/cat.png");
}

#[tokio::test]
async fn photo_host_urls_get_size_params() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"url": "https://img.example.com/unsplash.com/photo-1"})),
    )
    .await;

    let url = source_for(&server).fetch_image_url().await.expect("fetch ok");
    assert_eq!(url, "https://img.example.com/unsplash.com/photo-1?w=1080&q=80");
}

#[tokio::test]
async fn fails_on_http_status() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(500)).await;

    let err = source_for(&server).fetch_image_url().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn empty_or_missing_url_is_malformed() {
    for body in [json!({"url": ""}), json!({"link": "https://example.com/a.jpg"})] {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(200).set_body_json(body)).await;

        let err = source_for(&server).fetch_image_url().await.unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"),
    )
    .await;

    let err = source_for(&server).fetch_image_url().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn oversized_body_is_malformed() {
    let server = MockServer::start().await;
    let padding = "x".repeat(256);
    serve(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"url": "https://example.com/a.jpg", "pad": padding})),
    )
    .await;

    let source = ReqwestImageSource::new(SourceSettings {
        endpoint: format!("{}/image", server.uri()),
        max_body_bytes: 64,
        ..SourceSettings::default()
    });
    let err = source.fetch_image_url().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn times_out_on_slow_response() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200)
            .set_delay(Duration::from_millis(250))
            .set_body_json(json!({"url": "https://example.com/a.jpg"})),
    )
    .await;

    let source = ReqwestImageSource::new(SourceSettings {
        endpoint: format!("{}/image", server.uri()),
        request_timeout: Duration::from_millis(50),
        ..SourceSettings::default()
    });
    let err = source.fetch_image_url().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn invalid_endpoint_is_reported() {
    let source = ReqwestImageSource::new(SourceSettings {
        endpoint: "not a url".to_string(),
        ..SourceSettings::default()
    });
    let err = source.fetch_image_url().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidEndpoint);
}

#[test]
fn default_timeout_is_ten_seconds() {
    assert_eq!(
        SourceSettings::default().request_timeout,
        Duration::from_secs(10)
    );
}
