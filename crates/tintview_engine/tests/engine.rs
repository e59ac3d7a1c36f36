use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

use palette::Srgb;
use pretty_assertions::assert_eq;
use serde_json::json;
use tintview_engine::{
    ColorExtractor, EngineConfig, EngineEvent, EngineHandle, ExtractError, FailureKind,
    FetchError, ImageLoader, ImageSource, KmeansColorExtractor, LoadError, RenderedImage,
    SourceSettings,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_fn(16, 16, |_, _| image::Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

async fn next_event(engine: &EngineHandle) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "no engine event within 10s");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_load_and_extract_through_handle() {
    tintview_logging::initialize_for_tests();
    let server = MockServer::start().await;
    let image_url = format!("{}/photo.png", server.uri());
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": image_url })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(png_bytes([200, 30, 30]), "image/png"),
        )
        .mount(&server)
        .await;

    let engine = EngineHandle::new(EngineConfig {
        source: SourceSettings {
            endpoint: format!("{}/image", server.uri()),
            ..SourceSettings::default()
        },
        ..EngineConfig::default()
    });

    engine.fetch_image_url(1);
    let EngineEvent::ImageUrlFetched { request_id, result } = next_event(&engine).await else {
        panic!("expected url event");
    };
    assert_eq!(request_id, 1);
    assert_eq!(result.as_deref(), Ok(image_url.as_str()));

    engine.load_image(image_url.clone());
    assert_eq!(
        next_event(&engine).await,
        EngineEvent::ImageLoaded {
            image_url: image_url.clone(),
            result: Ok(()),
        }
    );

    engine.extract_color(image_url.clone());
    let EngineEvent::ColorExtracted { result, .. } = next_event(&engine).await else {
        panic!("expected color event");
    };
    let color = result.expect("color");
    assert!(color.red > 180 && color.green < 60, "got {color:?}");
}

struct FailingSource;

#[async_trait::async_trait]
impl ImageSource for FailingSource {
    async fn fetch_image_url(&self) -> Result<String, FetchError> {
        Err(FetchError {
            kind: FailureKind::Timeout,
            message: "simulated".to_string(),
        })
    }
}

struct NothingRendered;

#[async_trait::async_trait]
impl ImageLoader for NothingRendered {
    async fn load(&self, image_url: &str) -> Result<RenderedImage, LoadError> {
        Err(LoadError::Network(format!("offline: {image_url}")))
    }

    fn rendered(&self, _image_url: &str) -> Option<RenderedImage> {
        None
    }
}

struct FixedColor;

impl ColorExtractor for FixedColor {
    fn extract(&self, _encoded: &[u8]) -> Result<Srgb<u8>, ExtractError> {
        Ok(Srgb::new(1, 2, 3))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failures_are_reported_as_events() {
    let engine = EngineHandle::with_parts(
        Arc::new(FailingSource),
        Arc::new(NothingRendered),
        Arc::new(KmeansColorExtractor::default()),
    );

    engine.fetch_image_url(4);
    let EngineEvent::ImageUrlFetched { request_id, result } = next_event(&engine).await else {
        panic!("expected url event");
    };
    assert_eq!(request_id, 4);
    assert_eq!(result.unwrap_err().kind, FailureKind::Timeout);

    engine.load_image("https://example.com/a.jpg");
    let EngineEvent::ImageLoaded { result, .. } = next_event(&engine).await else {
        panic!("expected load event");
    };
    assert!(matches!(result, Err(LoadError::Network(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn extraction_needs_a_rendered_image() {
    let engine = EngineHandle::with_parts(
        Arc::new(FailingSource),
        Arc::new(NothingRendered),
        Arc::new(FixedColor),
    );

    engine.extract_color("https://example.com/a.jpg");
    assert_eq!(
        next_event(&engine).await,
        EngineEvent::ColorExtracted {
            image_url: "https://example.com/a.jpg".to_string(),
            result: Err(ExtractError::NotRendered(
                "https://example.com/a.jpg".to_string()
            )),
        }
    );
}
