use super::Command;
use crate::engine::Direction;

/// Horizontal swipe detection. Swiping left moves forward.
#[derive(Debug, Clone, Default)]
pub struct Swipe {
    start_x: Option<f32>,
}

impl Swipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish the gesture. A touch that never started counts from `x` itself.
    pub fn end(&mut self, x: f32, threshold: f32) -> Option<Command> {
        let start = self.start_x.take().unwrap_or(x);
        if x < start - threshold {
            Some(Command::Navigate(Direction::Forward))
        } else if x > start + threshold {
            Some(Command::Navigate(Direction::Back))
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_directions() {
        let mut swipe = Swipe::new();
        swipe.start(500.0);
        assert_eq!(swipe.end(300.0, 50.0), Some(Command::Navigate(Direction::Forward)));
        swipe.start(300.0);
        assert_eq!(swipe.end(500.0, 50.0), Some(Command::Navigate(Direction::Back)));
    }

    #[test]
    fn test_short_swipe_is_ignored() {
        let mut swipe = Swipe::new();
        swipe.start(500.0);
        assert_eq!(swipe.end(450.0, 50.0), None);
        assert_eq!(swipe.end(100.0, 50.0), None);
    }
}
