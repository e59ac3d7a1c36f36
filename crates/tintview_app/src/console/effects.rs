use std::time::Duration;

use tintview_core::{
    Color, Effect, ExtractFailure, FetchFailure, ImageUrl, Msg, RenderFailure,
};
use tintview_engine::{EngineConfig, EngineEvent, EngineHandle, ExtractError, FailureKind};
use tintview_logging::{tint_debug, tint_info, tint_warn};

use super::announcer::Announcer;

/// Executes state-machine effects against the engine and the announcer.
pub struct EffectRunner {
    engine: EngineHandle,
    announcer: Box<dyn Announcer>,
    in_flight: usize,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, announcer: Box<dyn Announcer>) -> Self {
        Self {
            engine: EngineHandle::new(config),
            announcer,
            in_flight: 0,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchImageUrl { request } => {
                    tint_info!("FetchImageUrl request={}", request);
                    self.engine.fetch_image_url(request);
                    self.in_flight += 1;
                }
                Effect::LoadImage { image_url } => {
                    tint_debug!("LoadImage url={}", image_url);
                    self.engine.load_image(image_url.into_string());
                    self.in_flight += 1;
                }
                Effect::ExtractColor { image_url } => {
                    tint_debug!("ExtractColor url={}", image_url);
                    self.engine.extract_color(image_url.into_string());
                    self.in_flight += 1;
                }
                Effect::Announce(announcement) => {
                    self.announcer.announce(announcement.text());
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine result.
    pub fn poll(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(map_event(event))
    }

    /// Engine commands issued but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ImageUrlFetched { request_id, result } => {
            let result = match result {
                Ok(url) => ImageUrl::new(url).ok_or(FetchFailure::MalformedResponse),
                Err(err) => {
                    tint_warn!("request {} failed: {}", request_id, err);
                    Err(map_failure(err.kind))
                }
            };
            Msg::ImageUrlFetched {
                request: request_id,
                result,
            }
        }
        EngineEvent::ImageLoaded { image_url, result } => {
            let Some(image_url) = ImageUrl::new(image_url) else {
                return Msg::NoOp;
            };
            match result {
                Ok(()) => Msg::RenderSucceeded { image_url },
                Err(err) => Msg::RenderFailed {
                    image_url,
                    failure: RenderFailure::new(err.to_string()),
                },
            }
        }
        EngineEvent::ColorExtracted { image_url, result } => {
            let Some(image_url) = ImageUrl::new(image_url) else {
                return Msg::NoOp;
            };
            let result = result
                .map(|rgb| Color::rgb(rgb.red, rgb.green, rgb.blue))
                .map_err(|err| map_extract_error(&err));
            Msg::ColorExtracted { image_url, result }
        }
    }
}

fn map_failure(kind: FailureKind) -> FetchFailure {
    match kind {
        FailureKind::InvalidEndpoint => FetchFailure::InvalidEndpoint,
        FailureKind::HttpStatus(code) => FetchFailure::HttpStatus(code),
        FailureKind::Timeout => FetchFailure::Timeout,
        FailureKind::MalformedResponse => FetchFailure::MalformedResponse,
        FailureKind::Network => FetchFailure::Network,
    }
}

fn map_extract_error(err: &ExtractError) -> ExtractFailure {
    match err {
        ExtractError::NotRendered(_) => ExtractFailure::NotRendered,
        ExtractError::Decode(_) => ExtractFailure::Decode,
        ExtractError::EmptyPalette => ExtractFailure::EmptyPalette,
    }
}
