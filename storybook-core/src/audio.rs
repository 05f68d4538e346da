use std::time::Duration;

use crate::config::AudioConfig;
use crate::error::PlaybackError;

/// The ambient audio element the crossfade drives.
pub trait AmbientTrack {
    fn set_source(&mut self, url: Option<&str>);
    fn source(&self) -> Option<&str>;
    /// Starts buffering the current source.
    fn load(&mut self);
    /// Enough is buffered to play without stalling.
    fn can_play_through(&self) -> bool;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}

/// In-memory track with no output device. Buffers instantly unless told otherwise.
#[derive(Debug, Clone)]
pub struct SilentTrack {
    source: Option<String>,
    paused: bool,
    volume: f32,
    buffered: bool,
    instant_buffer: bool,
    autoplay_blocked: bool,
    loads: usize,
}

impl Default for SilentTrack {
    fn default() -> Self {
        Self {
            source: None,
            paused: true,
            volume: 1.0,
            buffered: false,
            instant_buffer: true,
            autoplay_blocked: false,
            loads: 0,
        }
    }
}

impl SilentTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads stay unbuffered until [`finish_buffering`](Self::finish_buffering).
    pub fn with_manual_buffering(mut self) -> Self {
        self.instant_buffer = false;
        self
    }

    pub fn finish_buffering(&mut self) {
        self.buffered = self.source.is_some();
    }

    pub fn set_autoplay_blocked(&mut self, blocked: bool) {
        self.autoplay_blocked = blocked;
    }

    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl AmbientTrack for SilentTrack {
    fn set_source(&mut self, url: Option<&str>) {
        self.source = url.map(str::to_string);
        self.buffered = false;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self) {
        self.loads += 1;
        self.paused = true;
        self.buffered = self.instant_buffer && self.source.is_some();
    }

    fn can_play_through(&self) -> bool {
        self.buffered
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let Some(src) = &self.source else { return Err(PlaybackError::NoSource) };
        if self.autoplay_blocked {
            return Err(PlaybackError::AutoplayBlocked(src.clone()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[derive(Debug, Clone)]
struct Fade {
    from: f32,
    to: f32,
    step: u32,
    steps: u32,
    step_time: Duration,
    elapsed: Duration,
    pause_at_end: bool,
}

impl Fade {
    fn volume_at(&self, step: u32) -> f32 {
        let t = step as f32 / self.steps as f32;
        let v = self.from + (self.to - self.from) * t;
        let (lo, hi) = if self.from <= self.to { (self.from, self.to) } else { (self.to, self.from) };
        v.clamp(lo, hi)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Idle,
    /// Fading the old track out; the new source goes in afterwards.
    Swapping(Option<String>),
    /// New source loaded, waiting until it can play through.
    AwaitingPlayable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSignal {
    /// `play` was rejected; audio should be flagged off.
    Blocked,
}

/// Stepped fade-out / fade-in of the ambient track across slide changes.
/// At most one fade is active; starting another cancels it.
pub struct AudioCrossfade<T: AmbientTrack> {
    track: T,
    cfg: AudioConfig,
    fade: Option<Fade>,
    stage: Stage,
    enabled: bool,
}

impl<T: AmbientTrack> AudioCrossfade<T> {
    pub fn new(track: T, cfg: AudioConfig) -> Self {
        Self {
            track,
            cfg,
            fade: None,
            stage: Stage::Idle,
            enabled: false,
        }
    }

    pub fn track(&self) -> &T { &self.track }
    pub fn track_mut(&mut self) -> &mut T { &mut self.track }
    pub fn is_enabled(&self) -> bool { self.enabled }

    pub fn active_fades(&self) -> usize {
        self.fade.is_some() as usize
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Slide change: fade the playing track out, swap, then fade in once playable.
    pub fn change_track(&mut self, url: Option<&str>, enabled: bool) {
        self.enabled = enabled;
        let url = url.map(str::to_string);

        if !self.track.is_paused() {
            self.start_fade(0.0, true);
            self.stage = Stage::Swapping(url);
        } else {
            self.fade = None;
            self.swap(url);
        }
    }

    /// Mute/unmute outside of a slide change; the source stays.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<AudioSignal> {
        self.enabled = enabled;
        match (enabled, &self.stage) {
            // Pending swap/buffer picks the new flag up by itself.
            (_, Stage::Swapping(_)) => None,
            (true, Stage::AwaitingPlayable) => None,
            (false, Stage::AwaitingPlayable) => {
                self.stage = Stage::Idle;
                None
            }
            (true, Stage::Idle) => {
                if self.track.is_paused() || self.fade.as_ref().is_some_and(|f| f.pause_at_end) {
                    self.fade_in()
                } else {
                    None
                }
            }
            (false, Stage::Idle) => {
                if !self.track.is_paused() {
                    self.start_fade(0.0, true);
                }
                None
            }
        }
    }

    pub fn update(&mut self, dt: Duration) -> Option<AudioSignal> {
        if self.fade.is_some() && self.advance_fade(dt) {
            if let Stage::Swapping(url) = std::mem::replace(&mut self.stage, Stage::Idle) {
                self.swap(url);
            }
        }

        if self.stage == Stage::AwaitingPlayable && self.track.can_play_through() {
            self.stage = Stage::Idle;
            return self.fade_in();
        }
        None
    }

    fn swap(&mut self, url: Option<String>) {
        self.track.set_source(url.as_deref());
        self.track.load();
        self.stage = if self.enabled && url.is_some() {
            Stage::AwaitingPlayable
        } else {
            Stage::Idle
        };
        log::debug!("Ambient track -> {:?}", url);
    }

    fn fade_in(&mut self) -> Option<AudioSignal> {
        self.fade = None;
        if self.track.source().is_none() {
            return None;
        }
        self.track.set_volume(0.0);
        if let Err(e) = self.track.play() {
            log::error!("Ambient playback failed: {}", e);
            return Some(AudioSignal::Blocked);
        }
        self.start_fade(self.cfg.max_volume, false);
        None
    }

    fn start_fade(&mut self, to: f32, pause_at_end: bool) {
        if self.fade.is_some() {
            log::debug!("Cancelling running fade");
        }
        self.fade = Some(Fade {
            from: self.track.volume(),
            to,
            step: 0,
            steps: self.cfg.fade_steps.max(1),
            step_time: self.cfg.step_time(),
            elapsed: Duration::ZERO,
            pause_at_end,
        });
    }

    /// Returns true when the fade finished during this call.
    fn advance_fade(&mut self, dt: Duration) -> bool {
        let Some(fade) = self.fade.as_mut() else { return false };
        fade.elapsed += dt;
        while fade.elapsed >= fade.step_time && fade.step < fade.steps {
            fade.elapsed -= fade.step_time;
            fade.step += 1;
            self.track.set_volume(fade.volume_at(fade.step));
        }

        if fade.step < fade.steps {
            return false;
        }
        if fade.pause_at_end {
            self.track.pause();
        }
        self.fade = None;
        true
    }
}
