use crate::{Color, ExtractFailure, FetchFailure, ImageUrl, RenderFailure, RequestId, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Startup or the user asked for another image.
    FetchRequested,
    /// Image source client finished the request issued as `request`.
    ImageUrlFetched {
        request: RequestId,
        result: Result<ImageUrl, FetchFailure>,
    },
    /// Rendering collaborator has pixels for `image_url`.
    RenderSucceeded { image_url: ImageUrl },
    /// Rendering collaborator could not download or decode `image_url`.
    RenderFailed {
        image_url: ImageUrl,
        failure: RenderFailure,
    },
    /// Color extractor finished for `image_url`.
    ColorExtracted {
        image_url: ImageUrl,
        result: Result<Color, ExtractFailure>,
    },
    /// Platform switched between light and dark appearance.
    ThemeChanged(Theme),
    /// Fallback for placeholder wiring.
    NoOp,
}
