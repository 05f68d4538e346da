use std::collections::BTreeSet;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    Prev,
    GoTo(usize),
    ToggleAudio,
    SetAudioPlaying(bool),
    MarkInteracted(String),
    Reset,
}

/// Navigation, audio flag and interaction history. Every transition is total:
/// out-of-range requests are ignored, nothing panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    slide_count: usize,
    current: usize,
    audio_playing: bool,
    visited: BTreeSet<usize>,
    interactions: FxHashMap<String, bool>,
}

impl PlaybackState {
    pub fn new(slide_count: usize) -> Self {
        Self {
            slide_count,
            current: 0,
            audio_playing: false,
            visited: BTreeSet::from([0]),
            interactions: FxHashMap::default(),
        }
    }

    pub fn current_index(&self) -> usize { self.current }
    pub fn slide_count(&self) -> usize { self.slide_count }
    pub fn is_audio_playing(&self) -> bool { self.audio_playing }
    pub fn visited(&self) -> &BTreeSet<usize> { &self.visited }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.slide_count
    }

    pub fn has_interacted(&self, id: &str) -> bool {
        self.interactions.get(id).copied().unwrap_or(false)
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Next => {
                if self.current + 1 < self.slide_count {
                    self.current += 1;
                    self.visited.insert(self.current);
                }
            }
            Action::Prev => {
                if self.current > 0 {
                    self.current -= 1;
                    // Reachable below a goto target without ever being visited.
                    self.visited.insert(self.current);
                }
            }
            Action::GoTo(index) => {
                if index < self.slide_count {
                    self.current = index;
                    self.visited.insert(index);
                } else {
                    log::debug!("Ignoring goto {} (slides: {})", index, self.slide_count);
                }
            }
            Action::ToggleAudio => self.audio_playing = !self.audio_playing,
            Action::SetAudioPlaying(on) => self.audio_playing = on,
            Action::MarkInteracted(id) => {
                self.interactions.insert(id, true);
            }
            Action::Reset => {
                self.current = 0;
                self.visited = BTreeSet::from([0]);
                self.interactions.clear();
                self.audio_playing = false;
            }
        }
    }

    /// Pure form of [`dispatch`](Self::dispatch).
    pub fn apply(mut self, action: Action) -> Self {
        self.dispatch(action);
        self
    }
}
