pub mod assets;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod hotspot;
pub mod player;
pub mod renderer;
pub mod store;

pub use assets::{AssetCache, FsFetcher, ManualFetcher};
pub use audio::{AmbientTrack, AudioCrossfade, SilentTrack};
pub use catalog::{AssetIndex, Catalog};
pub use config::CoreConfig;
pub use engine::{LayerStack, SlideEngine};
pub use event::{InputEvent, OutputEvent};
pub use player::Player;
pub use renderer::terminal::TerminalRenderer;
pub use store::{Action, PlaybackState};
