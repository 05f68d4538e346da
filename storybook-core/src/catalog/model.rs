use std::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32, // 0.0~1.0 of canvas width
    pub y: f32, // 0.0~1.0 of canvas height
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Image(String),
    Video(String),
}

impl Background {
    pub fn url(&self) -> &str {
        match self {
            Self::Image(url) | Self::Video(url) => url,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video(_))
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Image(_) => AssetKind::Image,
            Self::Video(_) => AssetKind::Video,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDef {
    pub frames: Vec<String>,
    pub interval: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Sound { url: String },
    Replace { url: String, duration: Option<Duration> },
    Link { url: String, target: Option<String> },
    Download { url: String, filename: Option<String> },
    /// Reserved; dispatching it does nothing.
    Navigate { payload: serde_json::Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub id: String,
    pub image: String,
    pub active_image: Option<String>,
    pub position: Point,
    pub size: Extent,
    pub mobile_position: Option<Point>,
    pub mobile_size: Option<Extent>,
    pub z_index: Option<i32>,
    pub centered: bool,
    pub max_width: Option<String>,
    pub custom_class: Option<String>,
    pub no_hover: bool,
    pub interactions: Vec<Interaction>,
}

/// Hotspots without an explicit z-order sit with the object layer, above the background.
pub const DEFAULT_HOTSPOT_Z: i32 = 10;
/// Hotspots below this z-order are composited behind the main background.
pub const FRONT_Z_THRESHOLD: i32 = 5;

impl Hotspot {
    pub fn z(&self) -> i32 {
        self.z_index.unwrap_or(DEFAULT_HOTSPOT_Z)
    }

    pub fn is_behind_background(&self) -> bool {
        self.z() < FRONT_Z_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub background: Background,
    pub base_layer: Option<String>,
    pub toggle_base_layer: Option<String>,
    pub background_effect: Option<String>,
    pub sequence: Option<SequenceDef>,
    pub audio_track: Option<String>,
    pub click_sound: Option<String>,
    pub sequence_sound: Option<String>,
    pub background_bottom: bool,
    pub background_height: Option<String>,
    pub hotspots: Vec<Hotspot>,
}

impl Slide {
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    pub fn has_sequence(&self) -> bool {
        self.sequence.as_ref().is_some_and(|s| !s.frames.is_empty())
    }

    pub fn has_custom_animation(&self) -> bool {
        self.hotspots.iter().any(|h| h.custom_class.is_some())
    }

    /// Image whose dimensions size the slide container.
    pub fn sizing_image(&self) -> Option<&str> {
        match &self.background {
            Background::Image(url) => Some(url),
            Background::Video(_) => self.base_layer.as_deref(),
        }
    }

    /// Explicit render height from the catalog, in pixels, when it is given as one.
    pub fn aspect_hint(&self) -> Option<u32> {
        let raw = self.background_height.as_deref()?.trim();
        raw.trim_end_matches("px").trim().parse().ok()
    }

    /// Every image/video the slide can show, background first.
    pub fn visual_assets(&self) -> Vec<(String, AssetKind)> {
        let mut out = vec![(self.background.url().to_string(), self.background.kind())];
        let mut push = |url: &str| {
            if !url.is_empty() && !out.iter().any(|(u, _)| u == url) {
                out.push((url.to_string(), AssetKind::Image));
            }
        };

        for url in self.base_layer.iter().chain(self.toggle_base_layer.iter()) {
            push(url);
        }
        if let Some(seq) = &self.sequence {
            for frame in &seq.frames {
                push(frame);
            }
        }
        for hotspot in &self.hotspots {
            push(&hotspot.image);
            if let Some(active) = &hotspot.active_image {
                push(active);
            }
            for interaction in &hotspot.interactions {
                if let Interaction::Replace { url, .. } = interaction {
                    push(url);
                }
            }
        }
        out
    }

    pub fn audio_assets(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let fixed = [&self.audio_track, &self.click_sound, &self.sequence_sound];
        for url in fixed.into_iter().flatten() {
            if !out.contains(url) {
                out.push(url.clone());
            }
        }
        for hotspot in &self.hotspots {
            for interaction in &hotspot.interactions {
                if let Interaction::Sound { url } = interaction {
                    if !out.contains(url) {
                        out.push(url.clone());
                    }
                }
            }
        }
        out
    }
}
