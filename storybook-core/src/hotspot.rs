use std::time::Duration;
use rustc_hash::FxHashMap;

use crate::catalog::{Hotspot, Interaction, Slide};
use crate::config::{AudioConfig, EngineConfig};
use crate::engine::timer::Timer;
use crate::event::{EventQueue, OutputEvent};
use crate::store::{Action, PlaybackState};

/// Canvas size in CSS pixels; "mobile" below the breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    breakpoint: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, breakpoint: u32) -> Self {
        Self { width, height, breakpoint }
    }

    pub fn is_mobile(&self) -> bool {
        self.width <= self.breakpoint
    }
}

/// Normalized rectangle, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w &&
            y >= self.y && y <= self.y + self.h
    }
}

/// Where a hotspot sits for the given device class.
pub fn placement(hotspot: &Hotspot, mobile: bool) -> Rect {
    let pos = match (mobile, hotspot.mobile_position) {
        (true, Some(p)) => p,
        _ => hotspot.position,
    };
    let size = match (mobile, hotspot.mobile_size) {
        (true, Some(s)) => s,
        _ => hotspot.size,
    };

    // Centered objects are anchored on their middle.
    let (x, y) = if hotspot.centered {
        (pos.x - size.width / 2.0, pos.y - size.height / 2.0)
    } else {
        (pos.x, pos.y)
    };
    Rect { x, y, w: size.width, h: size.height }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotView {
    pub id: String,
    pub image: String,
    pub rect: Rect,
    pub z_index: i32,
    pub centered: bool,
    pub max_width: Option<String>,
    pub custom_class: Option<String>,
    pub no_hover: bool,
    /// Background toggle state, for presentation that reacts to it.
    pub toggled: bool,
    pub replaced: bool,
    pub interacted: bool,
}

struct Presentation {
    replacement: String,
    revert: Timer,
}

/// Tap handling and runtime presentation of the current slide's hotspots.
pub struct HotspotController {
    shown: FxHashMap<String, Presentation>,
    viewport: Viewport,
    default_replace: Duration,
    effect_volume: f32,
}

impl HotspotController {
    pub fn new(engine: &EngineConfig, audio: &AudioConfig) -> Self {
        Self {
            shown: FxHashMap::default(),
            viewport: Viewport::new(engine.fallback_width, engine.fallback_height, engine.mobile_breakpoint),
            default_replace: engine.replace_duration(),
            effect_volume: audio.effect_volume,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let was_mobile = self.viewport.is_mobile();
        self.viewport.width = width;
        self.viewport.height = height;
        if was_mobile != self.viewport.is_mobile() {
            log::debug!("Viewport {}x{} is now {}", width, height,
                if self.viewport.is_mobile() { "mobile" } else { "desktop" });
        }
    }

    /// Drops presentation overrides and pending reverts of the slide being left.
    pub fn enter_slide(&mut self) {
        self.shown.clear();
    }

    pub fn is_replaced(&self, id: &str) -> bool {
        self.shown.contains_key(id)
    }

    pub fn pending_reverts(&self) -> usize {
        self.shown.len()
    }

    /// Runs every interaction of hotspot `id` in order. Returns false for unknown ids.
    pub fn tap(
        &mut self,
        slide: &Slide,
        id: &str,
        state: &mut PlaybackState,
        events: &mut EventQueue,
    ) -> bool {
        let Some(hotspot) = slide.hotspot(id) else {
            log::debug!("Tap on unknown object '{}' in slide {}", id, slide.id);
            return false;
        };

        state.dispatch(Action::MarkInteracted(hotspot.id.clone()));

        for interaction in &hotspot.interactions {
            self.run(hotspot, interaction, state.is_audio_playing(), events);
        }
        true
    }

    fn run(&mut self, hotspot: &Hotspot, interaction: &Interaction, audio_enabled: bool, events: &mut EventQueue) {
        match interaction {
            Interaction::Sound { url } => {
                if audio_enabled {
                    events.push(OutputEvent::PlaySound { url: url.clone(), volume: self.effect_volume });
                }
            }
            Interaction::Replace { url, duration } => {
                let duration = duration.unwrap_or(self.default_replace);
                // A second tap restarts the countdown instead of stacking another one.
                self.shown.insert(hotspot.id.clone(), Presentation {
                    replacement: url.clone(),
                    revert: Timer::new(duration),
                });
            }
            Interaction::Link { url, target } => {
                events.push(OutputEvent::OpenUrl { url: url.clone(), target: target.clone() });
            }
            Interaction::Download { url, filename } => {
                events.push(OutputEvent::Download { url: url.clone(), filename: filename.clone() });
            }
            Interaction::Navigate { payload } => {
                log::debug!("Navigate interaction on '{}' is reserved: {}", hotspot.id, payload);
            }
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.shown.retain(|id, p| {
            let done = p.revert.tick(dt).is_some();
            if done {
                log::debug!("Object '{}' reverted", id);
            }
            !done
        });
    }

    /// Topmost hotspot under a normalized point.
    pub fn hit_test<'a>(&self, slide: &'a Slide, x: f32, y: f32) -> Option<&'a Hotspot> {
        let mobile = self.viewport.is_mobile();
        slide.hotspots
            .iter()
            .enumerate()
            .filter(|(_, h)| placement(h, mobile).contains(x, y))
            .max_by_key(|(i, h)| (h.z(), *i))
            .map(|(_, h)| h)
    }

    /// Views sorted by z-order, split into (behind background, in front of it).
    pub fn views(&self, slide: &Slide, toggled: bool, state: &PlaybackState) -> (Vec<HotspotView>, Vec<HotspotView>) {
        let mobile = self.viewport.is_mobile();
        let mut ordered: Vec<&Hotspot> = slide.hotspots.iter().collect();
        ordered.sort_by_key(|h| h.z());

        let mut behind = Vec::new();
        let mut front = Vec::new();
        for hotspot in ordered {
            let replaced = self.shown.get(&hotspot.id);
            let image = match (replaced, &hotspot.active_image) {
                (Some(p), _) => p.replacement.clone(),
                (None, Some(active)) if toggled => active.clone(),
                _ => hotspot.image.clone(),
            };
            let view = HotspotView {
                id: hotspot.id.clone(),
                image,
                rect: placement(hotspot, mobile),
                z_index: hotspot.z(),
                centered: hotspot.centered,
                max_width: hotspot.max_width.clone(),
                custom_class: hotspot.custom_class.clone(),
                no_hover: hotspot.no_hover,
                toggled,
                replaced: replaced.is_some(),
                interacted: state.has_interacted(&hotspot.id),
            };
            if hotspot.is_behind_background() {
                behind.push(view);
            } else {
                front.push(view);
            }
        }
        (behind, front)
    }
}
