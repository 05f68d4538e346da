use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    PlaySound { url: String, volume: f32 },
    OpenUrl { url: String, target: Option<String> },
    Download { url: String, filename: Option<String> },

    SlideChanged { index: usize },
    /// The ambient track refused to start; the store's audio flag was cleared.
    AudioBlocked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// First user gesture; unlocks audio.
    Start,
    TapBackground,
    TapHotspot { id: String },
    /// Tap in normalized canvas coordinates, resolved to a hotspot or the background.
    TapAt { x: f32, y: f32 },
    ToggleAudio,
    Next,
    Prev,
    GoTo { index: usize },
    Reset,
    Resize { width: u32, height: u32 },
    Exit,
}

#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<OutputEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: OutputEvent) {
        self.queue.push_back(event);
    }
    pub fn drain(&mut self) -> Vec<OutputEvent> {
        self.queue.drain(..).collect()
    }
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_keeps_order_and_empties() {
        let mut queue = EventQueue::default();
        queue.push(OutputEvent::SlideChanged { index: 1 });
        queue.push(OutputEvent::AudioBlocked);
        assert!(!queue.is_empty());

        assert_eq!(queue.drain(), vec![OutputEvent::SlideChanged { index: 1 }, OutputEvent::AudioBlocked]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
