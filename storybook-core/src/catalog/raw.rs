//! On-disk catalog records, shaped like the story data the content team writes,
//! and their validation into the typed model.

use std::sync::OnceLock;
use std::time::Duration;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::model::{Background, Extent, Hotspot, Interaction, Point, SequenceDef, Slide};
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawDocument {
    List(Vec<Value>),
    Table { slides: Vec<Value> },
}

impl RawDocument {
    /// Slides stay untyped here so one broken record cannot fail the document.
    pub(crate) fn into_slides(self) -> Vec<Value> {
        match self {
            Self::List(slides) | Self::Table { slides } => slides,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSlide {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub background_image: String,
    pub base_layer: Option<String>,
    pub toggle_base_layer: Option<String>,
    pub background_effect: Option<String>,
    pub background_sequence: Option<Vec<String>>,
    pub sequence_interval: Option<u64>,
    pub audio_track: Option<String>,
    pub click_sound: Option<String>,
    pub sequence_sound: Option<String>,
    #[serde(default)]
    pub is_background_bottom: bool,
    pub background_height: Option<Value>,
    #[serde(default)]
    pub objects: Vec<RawObject>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct RawPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct RawSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawObject {
    pub id: Value,
    pub gif_url: String,
    pub active_gif_url: Option<String>,
    pub position: RawPoint,
    pub mobile_position: Option<RawPoint>,
    pub size: RawSize,
    pub mobile_size: Option<RawSize>,
    pub z_index: Option<i32>,
    #[serde(default)]
    pub centered: bool,
    pub max_width: Option<Value>,
    pub custom_class: Option<String>,
    #[serde(default)]
    pub no_hover: bool,
    pub interaction: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawInteraction {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

fn video_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\.(mp4|webm)$").expect("static regex"))
}

pub(crate) fn is_video_url(url: &str) -> bool {
    video_pattern().is_match(url.trim())
}

fn clean(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

fn clamp_unit(value: f32, what: &str, slide: u32, object: &str) -> f32 {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        log::warn!("Slide {} object '{}': {} {} outside [0, 1], clamped.", slide, object, what, value);
        if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
    } else {
        value
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(format!("{}px", n)),
        _ => None,
    }
}

fn str_field(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| data.get(*k).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl RawInteraction {
    fn parse(value: Value, slide: u32, hotspot: &str) -> Result<Interaction, CatalogError> {
        let raw: RawInteraction = serde_json::from_value(value).map_err(|e| CatalogError::MalformedInteraction {
            slide,
            hotspot: hotspot.to_string(),
            msg: e.to_string(),
        })?;
        raw.validate(slide, hotspot)
    }

    fn validate(self, slide: u32, hotspot: &str) -> Result<Interaction, CatalogError> {
        if self.kind.trim().is_empty() {
            return Err(CatalogError::MissingField {
                slide,
                hotspot: hotspot.to_string(),
                kind: "interaction".to_string(),
                field: "type",
            });
        }

        let missing = |field: &'static str| CatalogError::MissingField {
            slide,
            hotspot: hotspot.to_string(),
            kind: self.kind.clone(),
            field,
        };

        match self.kind.as_str() {
            "sound" => {
                let url = str_field(&self.data, &["soundUrl", "url"]).ok_or_else(|| missing("soundUrl"))?;
                Ok(Interaction::Sound { url })
            }
            "replace" => {
                let url = str_field(&self.data, &["replacementGif", "url"]).ok_or_else(|| missing("replacementGif"))?;
                let duration = self.data.get("duration").and_then(Value::as_u64).map(Duration::from_millis);
                Ok(Interaction::Replace { url, duration })
            }
            "link" => {
                let url = str_field(&self.data, &["url", "href"]).ok_or_else(|| missing("url"))?;
                let target = str_field(&self.data, &["target"]);
                Ok(Interaction::Link { url, target })
            }
            "download" => {
                let url = str_field(&self.data, &["url", "fileUrl"]).ok_or_else(|| missing("url"))?;
                let filename = str_field(&self.data, &["filename", "fileName"]);
                Ok(Interaction::Download { url, filename })
            }
            "navigate" => Ok(Interaction::Navigate { payload: self.data }),
            _ => Err(CatalogError::UnknownInteraction {
                slide,
                hotspot: hotspot.to_string(),
                kind: self.kind.clone(),
            }),
        }
    }
}

impl RawObject {
    fn validate(self, slide: u32) -> Hotspot {
        let id = match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let entries = match self.interaction {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(many)) => many,
            Some(one) => vec![one],
        };

        // A broken entry only drops itself.
        let interactions = entries
            .into_iter()
            .filter_map(|value| match RawInteraction::parse(value, slide, &id) {
                Ok(i) => Some(i),
                Err(e) => {
                    log::warn!("Skipping interaction: {}", e);
                    None
                }
            })
            .collect();

        let point = |p: RawPoint| Point {
            x: clamp_unit(p.x, "x", slide, &id),
            y: clamp_unit(p.y, "y", slide, &id),
        };
        let extent = |s: RawSize| Extent {
            width: clamp_unit(s.width, "width", slide, &id),
            height: clamp_unit(s.height, "height", slide, &id),
        };

        Hotspot {
            image: self.gif_url.trim().to_string(),
            active_image: clean(self.active_gif_url),
            position: point(self.position),
            size: extent(self.size),
            mobile_position: self.mobile_position.map(point),
            mobile_size: self.mobile_size.map(extent),
            z_index: self.z_index,
            centered: self.centered,
            max_width: self.max_width.as_ref().and_then(scalar_string),
            custom_class: clean(self.custom_class),
            no_hover: self.no_hover,
            interactions,
            id,
        }
    }
}

impl RawSlide {
    /// `position` is the slide's place in the document, used when the record
    /// is too broken to report its own id.
    pub(crate) fn parse(value: Value, position: usize) -> Result<Self, CatalogError> {
        serde_json::from_value(value).map_err(|e| CatalogError::Malformed { position, msg: e.to_string() })
    }

    pub(crate) fn validate(self) -> Result<Slide, CatalogError> {
        let url = self.background_image.trim().to_string();
        if url.is_empty() {
            return Err(CatalogError::EmptyBackground { slide: self.id });
        }
        let background = if is_video_url(&url) {
            Background::Video(url)
        } else {
            Background::Image(url)
        };

        let sequence = self.background_sequence
            .map(|frames| frames.into_iter().filter_map(|f| clean(Some(f))).collect::<Vec<_>>())
            .filter(|frames| !frames.is_empty())
            .map(|frames| SequenceDef {
                frames,
                interval: self.sequence_interval.filter(|ms| *ms > 0).map(Duration::from_millis),
            });

        let slide_id = self.id;
        let mut seen = FxHashSet::default();
        let mut hotspots = Vec::with_capacity(self.objects.len());
        for object in self.objects {
            let hotspot = object.validate(slide_id);
            if !seen.insert(hotspot.id.clone()) {
                log::warn!("{}", CatalogError::DuplicateHotspot { slide: slide_id, hotspot: hotspot.id });
                continue;
            }
            hotspots.push(hotspot);
        }

        Ok(Slide {
            id: self.id,
            title: self.title,
            description: self.description,
            background,
            base_layer: clean(self.base_layer),
            toggle_base_layer: clean(self.toggle_base_layer),
            background_effect: clean(self.background_effect),
            sequence,
            audio_track: clean(self.audio_track),
            click_sound: clean(self.click_sound),
            sequence_sound: clean(self.sequence_sound),
            background_bottom: self.is_background_bottom,
            background_height: self.background_height.as_ref().and_then(scalar_string),
            hotspots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_extension_is_case_insensitive() {
        assert!(is_video_url("/images/story3/sky.mp4"));
        assert!(is_video_url("/a/b.WEBM "));
        assert!(!is_video_url("/a/mp4.png"));
    }

    #[test]
    fn single_interaction_object_is_accepted() {
        let object: RawObject = serde_json::from_value(serde_json::json!({
            "id": 7,
            "gifUrl": "/a.png",
            "position": { "x": 0.1, "y": 0.2 },
            "size": { "width": 0.1, "height": 0.1 },
            "interaction": { "type": "sound", "data": { "soundUrl": " /s.mp3 " } }
        }))
        .unwrap();
        let hotspot = object.validate(1);
        assert_eq!(hotspot.id, "7");
        assert_eq!(hotspot.interactions, vec![Interaction::Sound { url: "/s.mp3".into() }]);
    }

    #[test]
    fn interaction_without_type_is_missing_field() {
        let err = RawInteraction::parse(serde_json::json!({ "data": {} }), 3, "h").unwrap_err();
        assert!(matches!(err, CatalogError::MissingField { field: "type", .. }));

        let err = RawInteraction::parse(serde_json::json!("sound"), 3, "h").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedInteraction { slide: 3, .. }));
    }

    #[test]
    fn numeric_max_width_becomes_pixels() {
        assert_eq!(scalar_string(&serde_json::json!(400)), Some("400px".into()));
        assert_eq!(scalar_string(&serde_json::json!("50%")), Some("50%".into()));
        assert_eq!(scalar_string(&serde_json::json!(null)), None);
    }
}
