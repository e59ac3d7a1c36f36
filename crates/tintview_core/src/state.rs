use std::collections::VecDeque;

use crate::view_model::{AppViewModel, Phase};
use crate::{Color, ImageUrl, Theme};

/// Generation number issued for every dispatched fetch. Strictly increasing.
pub type RequestId = u64;

/// The only text a user ever sees for a failed fetch or render.
pub const FAILURE_MESSAGE: &str = "Failed to load image. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded {
        image_url: ImageUrl,
    },
    Error {
        message: String,
    },
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn image_url(&self) -> Option<&ImageUrl> {
        match self {
            FetchState::Loaded { image_url } => Some(image_url),
            _ => None,
        }
    }

    fn phase(&self) -> Phase {
        match self {
            FetchState::Idle => Phase::Idle,
            FetchState::Loading => Phase::Loading,
            FetchState::Loaded { .. } => Phase::Loaded,
            FetchState::Error { .. } => Phase::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    fetch: FetchState,
    theme: Theme,
    /// Last extracted color; `None` falls back to the theme default.
    extracted_background: Option<Color>,
    /// Last URL for which "loaded" was announced and extraction triggered.
    announced: Option<ImageUrl>,
    /// Extractions requested but not yet answered, oldest first.
    pending_extractions: VecDeque<ImageUrl>,
    latest_request: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn background(&self) -> Color {
        self.extracted_background
            .unwrap_or_else(|| self.theme.default_background())
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }

    pub fn view(&self) -> AppViewModel {
        let error_message = match &self.fetch {
            FetchState::Error { message } => Some(message.clone()),
            _ => None,
        };
        AppViewModel {
            phase: self.fetch.phase(),
            image_url: self.fetch.image_url().map(|url| url.as_str().to_owned()),
            error_message,
            background: self.background(),
            theme: self.theme,
            fetch_enabled: !self.fetch.is_loading(),
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_showing(&self, image_url: &ImageUrl) -> bool {
        self.fetch.image_url() == Some(image_url)
    }

    pub(crate) fn already_announced(&self, image_url: &ImageUrl) -> bool {
        self.announced.as_ref() == Some(image_url)
    }

    /// Moves to `Loading` and hands out the id the client result must carry.
    pub(crate) fn begin_fetch(&mut self) -> RequestId {
        self.latest_request += 1;
        self.fetch = FetchState::Loading;
        self.announced = None;
        self.dirty = true;
        self.latest_request
    }

    pub(crate) fn set_loaded(&mut self, image_url: ImageUrl) {
        self.fetch = FetchState::Loaded { image_url };
        self.dirty = true;
    }

    pub(crate) fn set_failed(&mut self) {
        self.fetch = FetchState::Error {
            message: crate::FAILURE_MESSAGE.to_owned(),
        };
        self.dirty = true;
    }

    /// Records the announcement and queues the extraction it triggers.
    pub(crate) fn mark_announced(&mut self, image_url: ImageUrl) {
        self.pending_extractions.push_back(image_url.clone());
        self.announced = Some(image_url);
    }

    /// Removes the oldest pending extraction for `image_url`.
    ///
    /// With `supersede_older`, every extraction requested before it is
    /// dropped too, so their late results are no longer applied. Returns
    /// false if no extraction for the URL is pending.
    pub(crate) fn settle_extraction(
        &mut self,
        image_url: &ImageUrl,
        supersede_older: bool,
    ) -> bool {
        let pending = &self.pending_extractions;
        let Some(position) = pending.iter().position(|url| url == image_url) else {
            return false;
        };
        if supersede_older {
            self.pending_extractions.drain(..=position);
        } else {
            self.pending_extractions.remove(position);
        }
        true
    }

    pub(crate) fn set_background(&mut self, color: Color) {
        if self.extracted_background != Some(color) {
            self.extracted_background = Some(color);
            self.dirty = true;
        }
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.dirty = true;
        }
    }
}
