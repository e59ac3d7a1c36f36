use std::fmt;

/// Why the image source client could not produce a URL.
///
/// Only ever logged; the user sees [`crate::FAILURE_MESSAGE`] regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    Timeout,
    HttpStatus(u16),
    MalformedResponse,
    InvalidEndpoint,
    Network,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "timeout"),
            FetchFailure::HttpStatus(code) => write!(f, "http status {code}"),
            FetchFailure::MalformedResponse => write!(f, "malformed response"),
            FetchFailure::InvalidEndpoint => write!(f, "invalid endpoint"),
            FetchFailure::Network => write!(f, "network error"),
        }
    }
}

/// The URL was accepted but its pixels never materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub reason: String,
}

impl RenderFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render failed: {}", self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractFailure {
    NotRendered,
    Decode,
    EmptyPalette,
}

impl fmt::Display for ExtractFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractFailure::NotRendered => write!(f, "image not rendered"),
            ExtractFailure::Decode => write!(f, "decode error"),
            ExtractFailure::EmptyPalette => write!(f, "empty palette"),
        }
    }
}
