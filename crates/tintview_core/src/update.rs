use tintview_logging::{tint_debug, tint_info, tint_warn};

use crate::{Announcement, AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FetchRequested => {
            if state.fetch_state().is_loading() {
                tint_debug!("fetch requested while loading; ignored");
                Vec::new()
            } else {
                let request = state.begin_fetch();
                vec![
                    Effect::FetchImageUrl { request },
                    Effect::Announce(Announcement::LoadingStarted),
                ]
            }
        }
        Msg::ImageUrlFetched { request, result } => {
            // A superseded request may still complete; only the latest one counts.
            if request != state.latest_request() || !state.fetch_state().is_loading() {
                tint_debug!(
                    "discarding result of request {} (latest {})",
                    request,
                    state.latest_request()
                );
                return (state, Vec::new());
            }
            match result {
                Ok(image_url) => {
                    tint_info!("image url accepted: {}", image_url);
                    state.set_loaded(image_url.clone());
                    vec![Effect::LoadImage { image_url }]
                }
                Err(failure) => {
                    tint_warn!("image url fetch failed: {}", failure);
                    state.set_failed();
                    vec![Effect::Announce(Announcement::Failed)]
                }
            }
        }
        Msg::RenderSucceeded { image_url } => {
            if !state.is_showing(&image_url) || state.already_announced(&image_url) {
                return (state, Vec::new());
            }
            state.mark_announced(image_url.clone());
            vec![
                Effect::ExtractColor { image_url },
                Effect::Announce(Announcement::Loaded),
            ]
        }
        Msg::RenderFailed { image_url, failure } => {
            if !state.is_showing(&image_url) {
                tint_debug!("ignoring render failure for stale url {}", image_url);
                return (state, Vec::new());
            }
            tint_warn!("{} ({})", failure, image_url);
            state.set_failed();
            vec![Effect::Announce(Announcement::Failed)]
        }
        Msg::ColorExtracted { image_url, result } => {
            // The background keeps its own lifecycle: a color is applied even if
            // the image is no longer shown, unless a newer color already landed.
            match result {
                Ok(color) if state.settle_extraction(&image_url, true) => {
                    state.set_background(color)
                }
                Ok(color) => {
                    tint_debug!("dropping outdated color {} for {}", color, image_url);
                }
                Err(failure) => {
                    state.settle_extraction(&image_url, false);
                    tint_debug!("color extraction failed for {}: {}", image_url, failure);
                }
            }
            Vec::new()
        }
        Msg::ThemeChanged(theme) => {
            state.set_theme(theme);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
