//! Per-slide visual state: load sequencing, fade-in, base layer toggle,
//! flip-book sequence and the background video lifecycle.

pub mod layers;
pub mod scope;
pub mod sequence;
pub mod timer;

use std::time::Duration;

use crate::assets::{AssetCache, PreloadBatch};
use crate::catalog::{Background, Catalog, Slide};
use crate::config::{AudioConfig, EngineConfig};
use crate::event::{EventQueue, OutputEvent};
use crate::hotspot::HotspotController;
use crate::store::PlaybackState;

pub use layers::{BackgroundFrame, Layer, LayerStack, NavigationView};
pub use scope::{SlideScope, VideoLease};
pub use sequence::{Direction, Sequence};
pub use timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unloaded,
    Loading,
    Ready { faded_in: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Slide not ready yet.
    Ignored,
    SequenceStarted,
    SequencePaused,
    LayerToggled(bool),
    PulseStarted,
    SpeedToggled(bool),
    NoAction,
}

pub struct SlideEngine {
    cfg: EngineConfig,
    effect_volume: f32,
    phase: Phase,
    batch: Option<PreloadBatch>,
    dimensions: (u32, u32),
    scope: Option<SlideScope>,
}

impl SlideEngine {
    pub fn new(cfg: EngineConfig, audio: &AudioConfig) -> Self {
        let dimensions = cfg.fallback_size();
        Self {
            cfg,
            effect_volume: audio.effect_volume,
            phase: Phase::Unloaded,
            batch: None,
            dimensions,
            scope: None,
        }
    }

    pub fn phase(&self) -> Phase { self.phase }
    pub fn dimensions(&self) -> (u32, u32) { self.dimensions }

    pub fn current(&self) -> Option<usize> {
        self.scope.as_ref().map(|s| s.index)
    }

    /// Background settled, so the slide accepts taps.
    pub fn is_interactive(&self) -> bool {
        matches!(self.phase, Phase::Ready { .. })
    }

    pub fn is_layer_toggled(&self) -> bool {
        self.scope.as_ref().is_some_and(|s| s.layer_toggled)
    }

    pub fn is_pulse_active(&self) -> bool {
        self.scope.as_ref().is_some_and(|s| s.pulse.is_some())
    }

    /// State exposed to hotspots: a toggled layer or a running pulse.
    pub fn is_toggled(&self) -> bool {
        self.is_layer_toggled() || self.is_pulse_active()
    }

    pub fn sequence_position(&self) -> Option<usize> {
        self.scope.as_ref()?.sequence.as_ref()?.position()
    }

    pub fn sequence_direction(&self) -> Option<Direction> {
        Some(self.scope.as_ref()?.sequence.as_ref()?.direction())
    }

    pub fn is_sequence_running(&self) -> bool {
        self.scope.as_ref().is_some_and(|s| s.sequence_timer.is_some())
    }

    pub fn is_speed_boosted(&self) -> bool {
        self.scope.as_ref().is_some_and(|s| s.speed_boosted)
    }

    pub fn pending_timers(&self) -> usize {
        self.scope.as_ref().map_or(0, SlideScope::pending_timers)
    }

    /// Leaves the current slide (if any) and starts loading `index`.
    /// The old scope is released before anything of the new slide is touched.
    pub fn enter(&mut self, index: usize, catalog: &Catalog, cache: &mut AssetCache) {
        self.leave();

        let Some(slide) = catalog.get(index) else {
            log::warn!("Slide {} does not exist", index);
            return;
        };

        log::debug!("Slide {} loading", index);
        self.batch = Some(cache.preload_slide(catalog, index));
        let sequence_len = slide.sequence.as_ref().map(|s| s.frames.len());
        self.scope = Some(SlideScope::new(index, sequence_len));
        self.phase = Phase::Loading;
    }

    pub fn leave(&mut self) {
        self.scope = None;
        self.batch = None;
        self.phase = Phase::Unloaded;
        self.dimensions = self.cfg.fallback_size();
    }

    pub fn update(
        &mut self,
        dt: Duration,
        catalog: &Catalog,
        cache: &mut AssetCache,
        audio_enabled: bool,
        events: &mut EventQueue,
    ) {
        let Some(index) = self.current() else { return };
        let Some(slide) = catalog.get(index) else { return };

        match self.phase {
            Phase::Unloaded => return,
            Phase::Loading => {
                let settled = self.batch.as_ref().is_none_or(|b| b.is_settled(cache));
                if settled {
                    self.become_ready(slide, cache);
                }
                // Fade-in waits for the next frame.
                return;
            }
            Phase::Ready { faded_in: false } => {
                self.phase = Phase::Ready { faded_in: true };
                log::debug!("Slide {} faded in", index);
            }
            Phase::Ready { faded_in: true } => {}
        }

        let interval = self.sequence_interval(slide);
        let effect_volume = self.effect_volume;
        let Some(scope) = self.scope.as_mut() else { return };

        if let Some(timer) = scope.sequence_timer.as_mut() {
            let mut budget = dt;
            while let Some(over) = timer.tick(budget) {
                if let Some(seq) = scope.sequence.as_mut() {
                    seq.advance();
                }
                if audio_enabled {
                    if let Some(url) = &slide.sequence_sound {
                        events.push(OutputEvent::PlaySound { url: url.clone(), volume: effect_volume });
                    }
                }
                *timer = Timer::new(interval);
                if over.is_zero() {
                    break;
                }
                budget = over;
            }
        }

        if let Some(pulse) = scope.pulse.as_mut() {
            if pulse.tick(dt).is_some() {
                scope.pulse = None;
                log::debug!("Slide {} animation pulse ended", index);
            }
        }

        if let Some(lease) = &scope.video {
            lease.with(|v| v.advance(dt));
        }
    }

    fn sequence_interval(&self, slide: &Slide) -> Duration {
        slide.sequence.as_ref()
            .and_then(|s| s.interval)
            .unwrap_or_else(|| self.cfg.sequence_interval())
    }

    fn become_ready(&mut self, slide: &Slide, cache: &AssetCache) {
        self.batch = None;

        self.dimensions = match slide.sizing_image() {
            Some(url) => match cache.get_ready_image(url) {
                Some(img) if img.width > 0 && img.height > 0 => (img.width, img.height),
                _ => {
                    log::warn!("No dimensions for {}, using fallback size", url);
                    self.cfg.fallback_size()
                }
            },
            None => self.cfg.fallback_size(),
        };

        let Some(scope) = self.scope.as_mut() else { return };

        if let Background::Video(url) = &slide.background {
            match cache.get_ready_video(url) {
                Some(handle) => {
                    let lease = VideoLease::acquire(handle, scope.index);
                    // A rejected play still shows the frame.
                    if let Err(e) = lease.play() {
                        log::warn!("{}, showing video paused", e);
                    }
                    scope.video = Some(lease);
                }
                None => log::warn!("Video {} unavailable, showing a blank frame", url),
            }
        }

        log::debug!("Slide {} ready ({}x{})", scope.index, self.dimensions.0, self.dimensions.1);
        self.phase = Phase::Ready { faded_in: false };
    }

    /// Whole-region tap on the background. Hotspot taps never come through here.
    pub fn tap_background(&mut self, catalog: &Catalog, audio_enabled: bool, events: &mut EventQueue) -> TapOutcome {
        if !self.is_interactive() {
            return TapOutcome::Ignored;
        }
        let Some(index) = self.current() else { return TapOutcome::Ignored };
        let Some(slide) = catalog.get(index) else { return TapOutcome::Ignored };
        let interval = self.sequence_interval(slide);
        let Some(scope) = self.scope.as_mut() else { return TapOutcome::Ignored };

        if audio_enabled {
            if let Some(url) = &slide.click_sound {
                events.push(OutputEvent::PlaySound { url: url.clone(), volume: self.effect_volume });
            }
        }

        // Sequence wins over every other background action.
        if let Some(seq) = scope.sequence.as_mut() {
            if scope.sequence_timer.take().is_some() {
                return TapOutcome::SequencePaused;
            }
            if seq.position().is_none() {
                seq.advance();
                if audio_enabled {
                    if let Some(url) = &slide.sequence_sound {
                        events.push(OutputEvent::PlaySound { url: url.clone(), volume: self.effect_volume });
                    }
                }
            }
            scope.sequence_timer = Some(Timer::new(interval));
            return TapOutcome::SequenceStarted;
        }

        if slide.toggle_base_layer.is_some() {
            scope.layer_toggled = !scope.layer_toggled;
            return TapOutcome::LayerToggled(scope.layer_toggled);
        }

        if slide.has_custom_animation() {
            scope.pulse = Some(Timer::new(self.cfg.custom_pulse()));
            return TapOutcome::PulseStarted;
        }

        if let Some(lease) = &scope.video {
            scope.speed_boosted = !scope.speed_boosted;
            let rate = if scope.speed_boosted { self.cfg.video_boost_rate } else { 1.0 };
            lease.with(|v| v.set_playback_rate(rate));
            return TapOutcome::SpeedToggled(scope.speed_boosted);
        }

        TapOutcome::NoAction
    }

    pub fn layers(&self, catalog: &Catalog, hotspots: &HotspotController, state: &PlaybackState) -> LayerStack {
        let index = self.current().unwrap_or(state.current_index());
        let slide = catalog.get(index);

        let navigation = NavigationView {
            show_prev: !state.is_first() && !state.is_last(),
            show_next: !state.is_last(),
            show_audio_toggle: !state.is_last(),
            audio_on: state.is_audio_playing(),
        };

        let mut stack = LayerStack {
            slide: index,
            title: slide.map(|s| s.title.clone()).unwrap_or_default(),
            phase: self.phase,
            aspect: self.dimensions,
            render_height: slide.and_then(Slide::aspect_hint),
            layers: Vec::new(),
        };

        let (Some(slide), Some(scope), true) = (slide, self.scope.as_ref(), self.is_interactive()) else {
            stack.layers.push(Layer::Navigation(navigation));
            return stack;
        };

        let active_base = match (&slide.toggle_base_layer, scope.layer_toggled) {
            (Some(alt), true) => Some(alt.clone()),
            _ => slide.base_layer.clone(),
        };

        let ambient = active_base.clone().or_else(|| match &slide.background {
            Background::Image(url) => Some(url.clone()),
            Background::Video(_) => None,
        });

        let frame = match (&slide.background, &scope.video) {
            (Background::Image(url), _) => BackgroundFrame::Image { url: url.clone() },
            (Background::Video(url), Some(lease)) => lease
                .with(|v| BackgroundFrame::Video {
                    url: url.clone(),
                    playing: !v.is_paused(),
                    rate: v.playback_rate(),
                    position: v.current_time(),
                })
                .unwrap_or(BackgroundFrame::Blank),
            (Background::Video(_), None) => BackgroundFrame::Blank,
        };

        let (behind, front) = hotspots.views(slide, self.is_toggled(), state);
        let main = Layer::MainBackground { frame, effect: slide.background_effect.clone() };
        let base = active_base.map(|url| Layer::Base { url });

        if let Some(url) = ambient {
            stack.layers.push(Layer::Ambient { url });
        }
        if slide.background_bottom {
            stack.layers.push(main);
            stack.layers.push(Layer::BehindHotspots(behind));
            stack.layers.extend(base);
        } else {
            stack.layers.extend(base);
            stack.layers.push(Layer::BehindHotspots(behind));
            stack.layers.push(main);
        }

        let frame_url = scope.sequence.as_ref()
            .and_then(Sequence::position)
            .and_then(|i| slide.sequence.as_ref().and_then(|s| s.frames.get(i)).map(|u| (i, u.clone())));
        if let Some((index, url)) = frame_url {
            stack.layers.push(Layer::SequenceFrame { url, index });
        }

        stack.layers.push(Layer::FrontHotspots(front));
        stack.layers.push(Layer::Navigation(navigation));
        stack
    }
}
