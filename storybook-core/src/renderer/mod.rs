pub mod terminal;

use crate::engine::LayerStack;
use crate::event::{InputEvent, OutputEvent};

/// Presents a composed frame plus the side effects raised since the last one,
/// and hands back the next user input if there is one.
pub trait Renderer {
    fn render(&mut self, frame: &LayerStack, events: &[OutputEvent]) -> Option<InputEvent>;
}
