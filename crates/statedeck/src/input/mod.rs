//! Input arbitration: every modality is reduced to a [`Command`].
//!
//! Modules here hold per-modality gesture state only. They never touch the
//! presenter; the session applies the commands they emit.

pub mod autoplay;
pub mod gamepad;
pub mod keyboard;
pub mod pointer;
pub mod touch;

use crate::engine::Direction;

/// Logical actions understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Navigate(Direction),
    /// Zero-based slide index.
    GoTo(usize),
    First,
    CycleState,
    ToggleAutoPlay,
    ResetProgress,
    ToggleNote,
    HideNote,
}

/// Keys the presenter reacts to, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    Escape,
    Tab,
    /// Letters and digits, lowercase.
    Char(char),
}

impl Key {
    pub fn arrow_direction(self) -> Option<Direction> {
        match self {
            Key::ArrowLeft => Some(Direction::Back),
            Key::ArrowRight => Some(Direction::Forward),
            _ => None,
        }
    }
}
