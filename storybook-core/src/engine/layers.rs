use std::time::Duration;

use crate::engine::Phase;
use crate::hotspot::HotspotView;

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundFrame {
    Image { url: String },
    Video { url: String, playing: bool, rate: f32, position: Duration },
    /// Asset failed; painted as an empty frame.
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationView {
    pub show_prev: bool,
    pub show_next: bool,
    pub show_audio_toggle: bool,
    pub audio_on: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Ambient { url: String },
    Base { url: String },
    BehindHotspots(Vec<HotspotView>),
    MainBackground { frame: BackgroundFrame, effect: Option<String> },
    SequenceFrame { url: String, index: usize },
    FrontHotspots(Vec<HotspotView>),
    Navigation(NavigationView),
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Ambient { .. } => "ambient",
            Layer::Base { .. } => "base",
            Layer::BehindHotspots(_) => "behind",
            Layer::MainBackground { .. } => "background",
            Layer::SequenceFrame { .. } => "sequence",
            Layer::FrontHotspots(_) => "front",
            Layer::Navigation(_) => "navigation",
        }
    }
}

/// Bottom-to-top paint list for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    pub slide: usize,
    pub title: String,
    pub phase: Phase,
    pub aspect: (u32, u32),
    pub render_height: Option<u32>,
    pub layers: Vec<Layer>,
}

impl LayerStack {
    pub fn is_loading(&self) -> bool {
        !matches!(self.phase, Phase::Ready { .. })
    }

    pub fn faded_in(&self) -> bool {
        matches!(self.phase, Phase::Ready { faded_in: true })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(Layer::name).collect()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.layers.iter().find_map(|l| match l {
            Layer::Base { url } => Some(url.as_str()),
            _ => None,
        })
    }

    pub fn background(&self) -> Option<&BackgroundFrame> {
        self.layers.iter().find_map(|l| match l {
            Layer::MainBackground { frame, .. } => Some(frame),
            _ => None,
        })
    }

    pub fn sequence_index(&self) -> Option<usize> {
        self.layers.iter().find_map(|l| match l {
            Layer::SequenceFrame { index, .. } => Some(*index),
            _ => None,
        })
    }

    pub fn hotspot(&self, id: &str) -> Option<&HotspotView> {
        self.layers.iter().find_map(|l| match l {
            Layer::BehindHotspots(items) | Layer::FrontHotspots(items) => items.iter().find(|h| h.id == id),
            _ => None,
        })
    }

    pub fn navigation(&self) -> Option<NavigationView> {
        self.layers.iter().find_map(|l| match l {
            Layer::Navigation(nav) => Some(*nav),
            _ => None,
        })
    }
}
