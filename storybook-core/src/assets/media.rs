use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use image::RgbaImage;

use crate::error::PlaybackError;

/// Decoded image, ready to paint.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Option<Arc<RgbaImage>>,
}

impl ImageHandle {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self { url: url.into(), width, height, pixels: None }
    }

    pub fn from_rgba(url: impl Into<String>, pixels: RgbaImage) -> Self {
        let (width, height) = pixels.dimensions();
        Self { url: url.into(), width, height, pixels: Some(Arc::new(pixels)) }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoInfo {
    pub byte_len: u64,
    pub duration: Option<Duration>,
}

/// One persistent video element per URL. Whoever holds `host` drives playback.
#[derive(Debug)]
pub struct VideoElement {
    url: String,
    info: VideoInfo,
    host: Option<usize>,
    paused: bool,
    muted: bool,
    looped: bool,
    current_time: Duration,
    playback_rate: f32,
    autoplay_blocked: bool,
    buffered: bool,
}

pub type VideoHandle = Rc<RefCell<VideoElement>>;

impl VideoElement {
    pub fn new(url: impl Into<String>, info: VideoInfo, buffered: bool) -> Self {
        Self {
            url: url.into(),
            info,
            host: None,
            paused: true,
            muted: false,
            looped: false,
            current_time: Duration::ZERO,
            playback_rate: 1.0,
            autoplay_blocked: false,
            buffered,
        }
    }

    pub fn into_handle(self) -> VideoHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn url(&self) -> &str { &self.url }
    pub fn info(&self) -> &VideoInfo { &self.info }
    pub fn host(&self) -> Option<usize> { self.host }
    pub fn is_paused(&self) -> bool { self.paused }
    pub fn is_muted(&self) -> bool { self.muted }
    pub fn is_looped(&self) -> bool { self.looped }
    pub fn current_time(&self) -> Duration { self.current_time }
    pub fn playback_rate(&self) -> f32 { self.playback_rate }
    pub fn is_buffered(&self) -> bool { self.buffered }

    /// Moves the element to `host`, returning the container it was taken from.
    pub fn attach(&mut self, host: usize) -> Option<usize> {
        let previous = self.host.replace(host);
        if let Some(prev) = previous.filter(|p| *p != host) {
            log::debug!("Video {} detached from slide {} for slide {}", self.url, prev, host);
        }
        previous
    }

    pub fn detach(&mut self) {
        self.host = None;
    }

    pub fn prepare_autoplay(&mut self) {
        self.muted = true;
        self.looped = true;
    }

    /// Platform policy hook: when set, `play` is rejected.
    pub fn set_autoplay_blocked(&mut self, blocked: bool) {
        self.autoplay_blocked = blocked;
    }

    pub fn mark_buffered(&mut self, info: VideoInfo) {
        self.info = info;
        self.buffered = true;
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.autoplay_blocked {
            return Err(PlaybackError::AutoplayBlocked(self.url.clone()));
        }
        self.paused = false;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        self.playback_rate = rate.max(0.0);
    }

    pub fn reset(&mut self) {
        self.current_time = Duration::ZERO;
        self.playback_rate = 1.0;
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.paused {
            return;
        }
        let mut t = self.current_time + dt.mul_f32(self.playback_rate);
        if let Some(total) = self.info.duration.filter(|d| !d.is_zero()) {
            if self.looped {
                let nanos = t.as_nanos() % total.as_nanos();
                t = Duration::from_nanos(nanos as u64);
            } else if t >= total {
                t = total;
                self.paused = true;
            }
        }
        self.current_time = t;
    }
}
