use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use tintview_logging::{tint_debug, tint_warn};

#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("invalid image url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("image larger than {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error("network error: {0}")]
    Network(String),
    #[error("undecodable image: {0}")]
    Decode(String),
}

/// Encoded bytes of the image currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub image_url: String,
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Rendering collaborator: turns an accepted URL into pixels.
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    /// Downloads and decodes the image, keeping it as the rendered image on success.
    async fn load(&self, image_url: &str) -> Result<RenderedImage, LoadError>;

    /// The rendered image for `image_url`, if it is the one currently held.
    fn rendered(&self, image_url: &str) -> Option<RenderedImage>;
}

/// Downloads with reqwest and keeps only the most recently requested image.
///
/// Every `load` takes a sequence number when it starts. A load that finishes
/// after a later one has started is returned to its caller but never held.
#[derive(Debug)]
pub struct ReqwestImageLoader {
    settings: LoaderSettings,
    issued: AtomicU64,
    current: Mutex<Option<(u64, RenderedImage)>>,
}

impl ReqwestImageLoader {
    pub fn new(settings: LoaderSettings) -> Self {
        Self {
            settings,
            issued: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<(u64, RenderedImage)>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tint_warn!("rendered image lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, LoadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| LoadError::Network(err.to_string()))
    }

    async fn download(&self, image_url: &str) -> Result<Bytes, LoadError> {
        let parsed = reqwest::Url::parse(image_url)
            .map_err(|err| LoadError::InvalidUrl(err.to_string()))?;
        let client = self.build_client()?;
        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus(status.as_u16()));
        }

        let max_bytes = self.settings.max_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(LoadError::TooLarge { max_bytes });
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(LoadError::TooLarge { max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(bytes))
    }

    fn store(&self, sequence: u64, rendered: RenderedImage) {
        if sequence != self.issued.load(Ordering::SeqCst) {
            tint_debug!("not holding superseded image {}", rendered.image_url);
            return;
        }
        let mut current = self.lock_current();
        if current.as_ref().is_some_and(|(held, _)| *held > sequence) {
            return;
        }
        *current = Some((sequence, rendered));
    }
}

#[async_trait::async_trait]
impl ImageLoader for ReqwestImageLoader {
    async fn load(&self, image_url: &str) -> Result<RenderedImage, LoadError> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let bytes = self.download(image_url).await?;
        let byte_len = bytes.len();

        // Decoding is CPU bound; keep it off the IO workers.
        let encoded = bytes.clone();
        let (width, height) = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&encoded)
                .map(|decoded| (decoded.width(), decoded.height()))
                .map_err(|err| LoadError::Decode(err.to_string()))
        })
        .await
        .map_err(|err| LoadError::Decode(err.to_string()))??;

        tint_debug!(
            "rendered {} ({}x{}, {} bytes)",
            image_url,
            width,
            height,
            byte_len
        );
        let rendered = RenderedImage {
            image_url: image_url.to_string(),
            bytes,
            width,
            height,
        };
        self.store(sequence, rendered.clone());
        Ok(rendered)
    }

    fn rendered(&self, image_url: &str) -> Option<RenderedImage> {
        self.lock_current()
            .as_ref()
            .filter(|(_, rendered)| rendered.image_url == image_url)
            .map(|(_, rendered)| rendered.clone())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> LoadError {
    if err.is_timeout() {
        return LoadError::Timeout;
    }
    LoadError::Network(err.to_string())
}
