pub mod model;
pub mod index;
mod raw;

use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

pub use index::AssetIndex;
pub use model::{AssetKind, Background, Extent, Hotspot, Interaction, Point, SequenceDef, Slide};

use crate::error::CatalogError;
use raw::{RawDocument, RawSlide};

/// Ordered, validated slide list. Read-only once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    slides: Vec<Slide>,
}

impl Catalog {
    pub fn new(slides: Vec<Slide>) -> Result<Self> {
        if slides.is_empty() {
            return Err(CatalogError::Empty.into());
        }
        Ok(Self { slides })
    }

    /// Loads a `.json` or `.toml` story file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {:?}", path))?;

        let is_toml = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let catalog = if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        catalog.with_context(|| format!("Invalid catalog: {:?}", path))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let doc: RawDocument = serde_json::from_str(content).context("Catalog JSON is malformed")?;
        Self::from_document(doc)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let doc: RawDocument = toml::from_str(content).context("Catalog TOML is malformed")?;
        Self::from_document(doc)
    }

    fn from_document(doc: RawDocument) -> Result<Self> {
        let mut ids = FxHashSet::default();
        let mut slides = Vec::new();

        for (position, value) in doc.into_slides().into_iter().enumerate() {
            let raw = match RawSlide::parse(value, position) {
                Ok(raw) => raw,
                Err(e) => {
                    log::error!("Rejecting slide: {}", e);
                    continue;
                }
            };
            let id = raw.id;
            if !ids.insert(id) {
                log::error!("{}", CatalogError::DuplicateSlide { slide: id });
                continue;
            }
            match raw.validate() {
                Ok(slide) => slides.push(slide),
                Err(e) => log::error!("Rejecting slide: {}", e),
            }
        }

        log::info!("Catalog loaded. Slides: {}", slides.len());
        Self::new(slides)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn asset_urls(&self, index: usize) -> Vec<String> {
        let Some(slide) = self.get(index) else { return Vec::new() };
        let mut urls: Vec<String> = slide.visual_assets().into_iter().map(|(u, _)| u).collect();
        for url in slide.audio_assets() {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls
    }
}
