use crate::assets::{VideoElement, VideoHandle};
use crate::engine::sequence::Sequence;
use crate::engine::timer::Timer;
use crate::error::PlaybackError;

/// Exclusive use of a cached video element by one slide.
///
/// Dropping the lease pauses the element, rewinds it, restores the normal rate and
/// detaches it, so the next visit starts from zero. A lease whose element was since
/// attached elsewhere touches nothing.
pub struct VideoLease {
    handle: VideoHandle,
    host: usize,
}

impl VideoLease {
    pub fn acquire(handle: VideoHandle, host: usize) -> Self {
        {
            let mut video = handle.borrow_mut();
            video.attach(host);
            video.prepare_autoplay();
        }
        Self { handle, host }
    }

    pub fn url(&self) -> String {
        self.handle.borrow().url().to_string()
    }

    /// Runs `f` only while this lease still owns the element.
    pub fn with<R>(&self, f: impl FnOnce(&mut VideoElement) -> R) -> Option<R> {
        let mut video = self.handle.borrow_mut();
        if video.host() != Some(self.host) {
            return None;
        }
        Some(f(&mut video))
    }

    pub fn play(&self) -> Result<(), PlaybackError> {
        self.with(|v| v.play()).unwrap_or(Err(PlaybackError::NoSource))
    }
}

impl Drop for VideoLease {
    fn drop(&mut self) {
        let released = self.with(|v| {
            v.pause();
            v.reset();
            v.detach();
        });
        if released.is_some() {
            log::debug!("Video released by slide {}", self.host);
        }
    }
}

/// Everything a slide acquires while it is on screen. Dropping it is the only
/// way to leave a slide, which releases timers and the video on every path.
pub struct SlideScope {
    pub(crate) index: usize,
    pub(crate) layer_toggled: bool,
    pub(crate) sequence: Option<Sequence>,
    pub(crate) sequence_timer: Option<Timer>,
    pub(crate) pulse: Option<Timer>,
    pub(crate) video: Option<VideoLease>,
    pub(crate) speed_boosted: bool,
}

impl SlideScope {
    pub fn new(index: usize, sequence_len: Option<usize>) -> Self {
        Self {
            index,
            layer_toggled: false,
            sequence: sequence_len.map(Sequence::new),
            sequence_timer: None,
            pulse: None,
            video: None,
            speed_boosted: false,
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.sequence_timer.is_some() as usize + self.pulse.is_some() as usize
    }
}

impl Drop for SlideScope {
    fn drop(&mut self) {
        log::debug!("Leaving slide {} ({} timers cancelled)", self.index, self.pending_timers());
    }
}
