use crate::{Color, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: Phase,
    /// Present only while `phase == Phase::Loaded`.
    pub image_url: Option<String>,
    pub error_message: Option<String>,
    pub background: Color,
    pub theme: Theme,
    /// The fetch trigger is disabled while a request is in flight.
    pub fetch_enabled: bool,
}
