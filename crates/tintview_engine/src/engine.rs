use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tintview_logging::{tint_debug, tint_info};

use crate::extract::{ColorExtractor, ExtractError, ExtractorSettings, KmeansColorExtractor};
use crate::loader::{ImageLoader, LoaderSettings, ReqwestImageLoader};
use crate::source::{ImageSource, ReqwestImageSource, SourceSettings};
use crate::{EngineEvent, RequestId, Rgb};

/// Settings for every collaborator the engine drives.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub source: SourceSettings,
    pub loader: LoaderSettings,
    pub extractor: ExtractorSettings,
}

enum EngineCommand {
    FetchImageUrl { request_id: RequestId },
    LoadImage { image_url: String },
    ExtractColor { image_url: String },
}

#[derive(Clone)]
struct Parts {
    source: Arc<dyn ImageSource>,
    loader: Arc<dyn ImageLoader>,
    extractor: Arc<dyn ColorExtractor>,
}

/// Runs network and extraction work on a background tokio runtime.
///
/// Commands never block the caller; results come back as [`EngineEvent`]s in
/// completion order, which is not necessarily submission order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        tint_info!("image endpoint: {}", config.source.endpoint);
        Self::with_parts(
            Arc::new(ReqwestImageSource::new(config.source)),
            Arc::new(ReqwestImageLoader::new(config.loader)),
            Arc::new(KmeansColorExtractor::new(config.extractor)),
        )
    }

    pub fn with_parts(
        source: Arc<dyn ImageSource>,
        loader: Arc<dyn ImageLoader>,
        extractor: Arc<dyn ColorExtractor>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let parts = Parts {
            source,
            loader,
            extractor,
        };

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let parts = parts.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&parts, command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn fetch_image_url(&self, request_id: RequestId) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchImageUrl { request_id });
    }

    pub fn load_image(&self, image_url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::LoadImage {
            image_url: image_url.into(),
        });
    }

    pub fn extract_color(&self, image_url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::ExtractColor {
            image_url: image_url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    parts: &Parts,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchImageUrl { request_id } => {
            tint_debug!("fetching image url for request {}", request_id);
            let result = parts.source.fetch_image_url().await;
            EngineEvent::ImageUrlFetched { request_id, result }
        }
        EngineCommand::LoadImage { image_url } => {
            let result = parts.loader.load(&image_url).await.map(|_| ());
            EngineEvent::ImageLoaded { image_url, result }
        }
        EngineCommand::ExtractColor { image_url } => {
            let result = extract(parts, &image_url).await;
            EngineEvent::ColorExtracted { image_url, result }
        }
    };
    let _ = event_tx.send(event);
}

async fn extract(parts: &Parts, image_url: &str) -> Result<Rgb, ExtractError> {
    let rendered = parts
        .loader
        .rendered(image_url)
        .ok_or_else(|| ExtractError::NotRendered(image_url.to_string()))?;
    let extractor = parts.extractor.clone();
    tokio::task::spawn_blocking(move || extractor.extract(&rendered.bytes))
        .await
        .map_err(|err| ExtractError::Decode(err.to_string()))?
}
