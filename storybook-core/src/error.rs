use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("slide {slide}: background is empty")]
    EmptyBackground { slide: u32 },

    #[error("slide {slide}: duplicate slide id")]
    DuplicateSlide { slide: u32 },

    #[error("slide {slide}, object '{hotspot}': duplicate object id")]
    DuplicateHotspot { slide: u32, hotspot: String },

    #[error("slide {slide}, object '{hotspot}': '{kind}' interaction is missing '{field}'")]
    MissingField { slide: u32, hotspot: String, kind: String, field: &'static str },

    #[error("slide {slide}, object '{hotspot}': unknown interaction type '{kind}'")]
    UnknownInteraction { slide: u32, hotspot: String, kind: String },

    #[error("slide {slide}, object '{hotspot}': malformed interaction: {msg}")]
    MalformedInteraction { slide: u32, hotspot: String, msg: String },

    #[error("slide #{position}: malformed record: {msg}")]
    Malformed { position: usize, msg: String },

    #[error("catalog has no usable slides")]
    Empty,
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("failed to read {url}: {source}")]
    Io { url: String, #[source] source: std::io::Error },

    #[error("failed to decode {url}: {msg}")]
    Decode { url: String, msg: String },

    #[error("{url} is empty")]
    Empty { url: String },

    #[error("{url} not ready after {waited:?}")]
    Timeout { url: String, waited: Duration },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("autoplay blocked for {0}")]
    AutoplayBlocked(String),

    #[error("no source loaded")]
    NoSource,

    #[error("audio backend: {0}")]
    Backend(String),
}
