use crate::{ImageUrl, RequestId, FAILURE_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the image source client for a new URL.
    FetchImageUrl { request: RequestId },
    /// Ask the rendering collaborator to materialize pixels for the URL.
    LoadImage { image_url: ImageUrl },
    /// Ask the color extractor for a background color.
    ExtractColor { image_url: ImageUrl },
    /// Hand a message to the accessibility announcer.
    Announce(Announcement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    LoadingStarted,
    Loaded,
    Failed,
}

impl Announcement {
    pub fn text(self) -> &'static str {
        match self {
            Announcement::LoadingStarted => "Loading image",
            Announcement::Loaded => "Image loaded",
            Announcement::Failed => FAILURE_MESSAGE,
        }
    }
}
