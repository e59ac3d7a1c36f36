//! Tintview engine: image source client, image loading and color extraction.
mod engine;
mod extract;
mod loader;
mod sizing;
mod source;
mod types;

pub use engine::{EngineConfig, EngineHandle};
pub use extract::{
    ColorExtractor, ExtractError, ExtractorSettings, KmeansColorExtractor, Palette, Swatch,
    NEUTRAL_BACKGROUND,
};
pub use loader::{ImageLoader, LoadError, LoaderSettings, RenderedImage, ReqwestImageLoader};
pub use sizing::SizingRule;
pub use source::{
    parse_url_field, ImageSource, ReqwestImageSource, SourceSettings, DEFAULT_ENDPOINT,
};
pub use types::{EngineEvent, FailureKind, FetchError, RequestId, Rgb};
