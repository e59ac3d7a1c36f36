use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use tintview_engine::{ImageLoader, LoadError, LoaderSettings, ReqwestImageLoader};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) -> String {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
    format!("{}{}", server.uri(), route)
}

#[tokio::test(flavor = "multi_thread")]
async fn loads_decodes_and_keeps_rendered_image() {
    let server = MockServer::start().await;
    let url = mount(
        &server,
        "/a.png",
        ResponseTemplate::new(200).set_body_raw(png_bytes(6, 4, [10, 20, 30]), "image/png"),
    )
    .await;

    let loader = ReqwestImageLoader::new(LoaderSettings::default());
    let rendered = loader.load(&url).await.expect("load ok");
    assert_eq!((rendered.width, rendered.height), (6, 4));

    let held = loader.rendered(&url).expect("held");
    assert_eq!(held, rendered);
    assert!(loader.rendered("https://example.com/other.png").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn only_latest_image_is_held() {
    let server = MockServer::start().await;
    let first = mount(
        &server,
        "/first.png",
        ResponseTemplate::new(200).set_body_raw(png_bytes(2, 2, [1, 1, 1]), "image/png"),
    )
    .await;
    let second = mount(
        &server,
        "/second.png",
        ResponseTemplate::new(200).set_body_raw(png_bytes(3, 3, [2, 2, 2]), "image/png"),
    )
    .await;

    let loader = ReqwestImageLoader::new(LoaderSettings::default());
    loader.load(&first).await.unwrap();
    loader.load(&second).await.unwrap();
    assert!(loader.rendered(&first).is_none());
    assert!(loader.rendered(&second).is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn superseded_load_does_not_evict_current_image() {
    let server = MockServer::start().await;
    let old = mount(
        &server,
        "/old.png",
        ResponseTemplate::new(200)
            .set_body_raw(png_bytes(2, 2, [1, 1, 1]), "image/png")
            .set_delay(Duration::from_millis(400)),
    )
    .await;
    let new = mount(
        &server,
        "/new.png",
        ResponseTemplate::new(200).set_body_raw(png_bytes(3, 3, [2, 2, 2]), "image/png"),
    )
    .await;

    let loader = Arc::new(ReqwestImageLoader::new(LoaderSettings::default()));
    let slow = {
        let loader = loader.clone();
        let old = old.clone();
        tokio::spawn(async move { loader.load(&old).await })
    };
    // Let the slow load start before the newer one is requested.
    tokio::time::sleep(Duration::from_millis(50)).await;

    loader.load(&new).await.expect("new load ok");
    assert!(loader.rendered(&new).is_some());

    let finished = slow.await.unwrap().expect("old load still succeeds");
    assert_eq!((finished.width, finished.height), (2, 2));
    assert!(loader.rendered(&new).is_some());
    assert!(loader.rendered(&old).is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn broken_link_reports_status() {
    let server = MockServer::start().await;
    let url = mount(&server, "/gone.jpg", ResponseTemplate::new(404)).await;

    let loader = ReqwestImageLoader::new(LoaderSettings::default());
    assert_eq!(loader.load(&url).await.unwrap_err(), LoadError::HttpStatus(404));
    assert!(loader.rendered(&url).is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn undecodable_bytes_fail() {
    let server = MockServer::start().await;
    let url = mount(
        &server,
        "/fake.jpg",
        ResponseTemplate::new(200).set_body_raw("<html>not an image</html>", "image/jpeg"),
    )
    .await;

    let loader = ReqwestImageLoader::new(LoaderSettings::default());
    let err = loader.load(&url).await.unwrap_err();
    assert!(matches!(err, LoadError::Decode(_)), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn rejects_oversized_image() {
    let server = MockServer::start().await;
    let url = mount(
        &server,
        "/big.png",
        ResponseTemplate::new(200).set_body_raw(png_bytes(64, 64, [9, 9, 9]), "image/png"),
    )
    .await;

    let loader = ReqwestImageLoader::new(LoaderSettings {
        max_bytes: 16,
        ..LoaderSettings::default()
    });
    assert_eq!(
        loader.load(&url).await.unwrap_err(),
        LoadError::TooLarge { max_bytes: 16 }
    );
}

#[tokio::test]
async fn invalid_url_is_rejected() {
    let loader = ReqwestImageLoader::new(LoaderSettings::default());
    let err = loader.load("::nope::").await.unwrap_err();
    assert!(matches!(err, LoadError::InvalidUrl(_)));
}
