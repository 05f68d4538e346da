#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Flip-book position stepping 0..len-1 and back, turning only at the ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    len: usize,
    position: Option<usize>,
    direction: Direction,
}

impl Sequence {
    pub fn new(len: usize) -> Self {
        Self { len, position: None, direction: Direction::Forward }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    /// `None` until the first step.
    pub fn position(&self) -> Option<usize> { self.position }
    pub fn direction(&self) -> Direction { self.direction }

    pub fn reset(&mut self) {
        self.position = None;
        self.direction = Direction::Forward;
    }

    pub fn advance(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let next = match (self.position, self.direction) {
            (None, _) => 0,
            (Some(_), _) if self.len == 1 => 0,
            (Some(p), Direction::Forward) if p + 1 < self.len => p + 1,
            (Some(p), Direction::Forward) => {
                self.direction = Direction::Backward;
                p - 1
            }
            (Some(p), Direction::Backward) if p > 0 => p - 1,
            (Some(p), Direction::Backward) => {
                self.direction = Direction::Forward;
                p + 1
            }
        };
        self.position = Some(next);
        self.position
    }
}
