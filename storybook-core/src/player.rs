use std::time::Duration;

use crate::assets::AssetCache;
use crate::audio::{AmbientTrack, AudioCrossfade, AudioSignal};
use crate::catalog::Catalog;
use crate::config::CoreConfig;
use crate::engine::{LayerStack, SlideEngine};
use crate::event::{EventQueue, InputEvent, OutputEvent};
use crate::hotspot::HotspotController;
use crate::store::{Action, PlaybackState};

/// Owns every piece of a running story and routes input between them.
pub struct Player<T: AmbientTrack> {
    catalog: Catalog,
    state: PlaybackState,
    cache: AssetCache,
    engine: SlideEngine,
    hotspots: HotspotController,
    audio: AudioCrossfade<T>,
    events: EventQueue,
    started: bool,
}

impl<T: AmbientTrack> Player<T> {
    pub fn new(catalog: Catalog, cache: AssetCache, track: T, cfg: CoreConfig) -> Self {
        let state = PlaybackState::new(catalog.len());
        let engine = SlideEngine::new(cfg.engine.clone(), &cfg.audio);
        let hotspots = HotspotController::new(&cfg.engine, &cfg.audio);
        let audio = AudioCrossfade::new(track, cfg.audio);

        let mut player = Self {
            catalog,
            state,
            cache,
            engine,
            hotspots,
            audio,
            events: EventQueue::default(),
            started: false,
        };
        player.enter_current();
        player
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn state(&self) -> &PlaybackState { &self.state }
    pub fn cache(&self) -> &AssetCache { &self.cache }
    pub fn engine(&self) -> &SlideEngine { &self.engine }
    pub fn hotspots(&self) -> &HotspotController { &self.hotspots }
    pub fn audio(&self) -> &AudioCrossfade<T> { &self.audio }
    pub fn track_mut(&mut self) -> &mut T { self.audio.track_mut() }
    pub fn is_started(&self) -> bool { self.started }

    pub fn feed(&mut self, event: InputEvent) {
        match event {
            InputEvent::Start => {
                if self.started {
                    return;
                }
                log::info!("Story started");
                self.started = true;
                self.state.dispatch(Action::SetAudioPlaying(true));
                let track = self.current_track();
                self.audio.change_track(track.as_deref(), true);
            }
            InputEvent::TapBackground => {
                let outcome = self.engine.tap_background(&self.catalog, self.state.is_audio_playing(), &mut self.events);
                log::debug!("Background tap: {:?}", outcome);
            }
            InputEvent::TapHotspot { id } => self.tap_hotspot(&id),
            InputEvent::TapAt { x, y } => {
                let hit = self.catalog.get(self.state.current_index())
                    .and_then(|slide| self.hotspots.hit_test(slide, x, y))
                    .map(|h| h.id.clone());
                match hit {
                    Some(id) => self.tap_hotspot(&id),
                    None => self.feed(InputEvent::TapBackground),
                }
            }
            InputEvent::ToggleAudio => {
                self.state.dispatch(Action::ToggleAudio);
                let signal = self.audio.set_enabled(self.state.is_audio_playing());
                self.handle_signal(signal);
            }
            InputEvent::Next => self.navigate(Action::Next),
            InputEvent::Prev => self.navigate(Action::Prev),
            InputEvent::GoTo { index } => self.navigate(Action::GoTo(index)),
            InputEvent::Reset => {
                self.state.dispatch(Action::Reset);
                self.audio.set_enabled(false);
                self.enter_current();
            }
            InputEvent::Resize { width, height } => self.hotspots.resize(width, height),
            InputEvent::Exit => log::info!("Exit requested"),
        }
    }

    fn tap_hotspot(&mut self, id: &str) {
        // Layers are not interactive until the background is.
        if !self.engine.is_interactive() {
            return;
        }
        if let Some(slide) = self.catalog.get(self.state.current_index()) {
            self.hotspots.tap(slide, id, &mut self.state, &mut self.events);
        }
    }

    fn navigate(&mut self, action: Action) {
        let before = self.state.current_index();
        self.state.dispatch(action);
        if self.state.current_index() != before {
            self.enter_current();
        }
    }

    fn current_track(&self) -> Option<String> {
        self.catalog.get(self.state.current_index()).and_then(|s| s.audio_track.clone())
    }

    /// Old slide is released inside `engine.enter` before the new one is set up.
    fn enter_current(&mut self) {
        let index = self.state.current_index();
        log::info!("Entering slide {}", index);
        self.engine.enter(index, &self.catalog, &mut self.cache);
        self.hotspots.enter_slide();

        if self.started {
            let track = self.current_track();
            self.audio.change_track(track.as_deref(), self.state.is_audio_playing());
        }
        self.events.push(OutputEvent::SlideChanged { index });
    }

    fn handle_signal(&mut self, signal: Option<AudioSignal>) {
        if let Some(AudioSignal::Blocked) = signal {
            self.state.dispatch(Action::SetAudioPlaying(false));
            self.events.push(OutputEvent::AudioBlocked);
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.cache.update(dt);
        self.engine.update(dt, &self.catalog, &mut self.cache, self.state.is_audio_playing(), &mut self.events);
        self.hotspots.update(dt);
        let signal = self.audio.update(dt);
        self.handle_signal(signal);
    }

    pub fn layers(&self) -> LayerStack {
        self.engine.layers(&self.catalog, &self.hotspots, &self.state)
    }

    pub fn drain(&mut self) -> Vec<OutputEvent> {
        self.events.drain()
    }
}
