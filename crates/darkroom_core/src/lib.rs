pub mod advisory;
pub mod baths;
pub mod controller;
mod drying;
pub mod error;
mod exposure;
pub mod image_provider;
pub mod render;
mod session;
pub mod store;
pub mod timers;
pub mod timing;

pub use controller::{DarkroomEvent, StageController};
pub use error::{DarkroomError, GenerationError, StoreError};
pub use image_provider::{HttpImageProvider, ImageProvider, UnavailableImageProvider};
pub use render::{compute_transform, reference_transform};
pub use store::{ProcessPatch, ProcessStore};
pub use timers::TimerSlot;
pub use timing::Timing;
