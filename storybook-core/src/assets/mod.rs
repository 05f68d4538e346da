pub mod cache;
pub mod fetch;
pub mod media;

pub use cache::{AssetCache, AssetStatus, PreloadBatch, Priority};
pub use fetch::{AssetFetcher, FetchResult, Fetched, FsFetcher, ManualFetcher};
pub use media::{ImageHandle, VideoElement, VideoHandle, VideoInfo};
