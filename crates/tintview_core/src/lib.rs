//! Tintview core: pure image-fetch state machine and view-model helpers.
mod color;
mod effect;
mod failure;
mod image_url;
mod msg;
mod state;
mod store;
mod update;
mod view_model;

pub use color::{Color, Theme};
pub use effect::{Announcement, Effect};
pub use failure::{ExtractFailure, FetchFailure, RenderFailure};
pub use image_url::ImageUrl;
pub use msg::Msg;
pub use state::{AppState, FetchState, RequestId, FAILURE_MESSAGE};
pub use store::{Observer, Store, SubscriptionId};
pub use update::update;
pub use view_model::{AppViewModel, Phase};
