//! Slide/state navigation engine.
//!
//! Everything in here is host-agnostic: time is a monotonic millisecond
//! counter supplied by the caller, storage and content are traits, and no
//! module touches egui.

pub mod feedback;
pub mod presenter;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use presenter::Presenter;

/// Navigation direction shared by every input modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    pub fn delta(self) -> isize {
        match self {
            Self::Back => -1,
            Self::Forward => 1,
        }
    }
}
