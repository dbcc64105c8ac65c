use super::registry::SlideRegistry;

/// Current slide plus the state index of every slide.
///
/// Invariants: `current_slide < slide_states.len()` and
/// `slide_states[i] < max_states(i)`. Only the presenter mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationState {
    pub(super) current_slide: usize,
    pub(super) slide_states: Vec<usize>,
}

impl PresentationState {
    pub fn new(slide_count: usize) -> Self {
        Self {
            current_slide: 0,
            slide_states: vec![0; slide_count],
        }
    }

    /// Merge persisted values with defaults. Anything that does not fit the
    /// registry is dropped; a states array with any out-of-range entry is
    /// discarded as a whole.
    pub fn restore(registry: &SlideRegistry, current_slide: usize, states: Vec<usize>) -> Self {
        let count = registry.slide_count();
        let current_slide = if current_slide < count { current_slide } else { 0 };
        let compatible = states.len() == count
            && states
                .iter()
                .enumerate()
                .all(|(i, &s)| s < registry.max_states(i));
        let slide_states = if compatible {
            states
        } else {
            if states.iter().any(|&s| s != 0) {
                tracing::debug!("saved slide states do not fit this deck, starting fresh");
            }
            vec![0; count]
        };
        Self {
            current_slide,
            slide_states,
        }
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn slide_states(&self) -> &[usize] {
        &self.slide_states
    }

    pub fn state_of(&self, slide: usize) -> usize {
        self.slide_states.get(slide).copied().unwrap_or(0)
    }

    pub fn current_state(&self) -> usize {
        self.state_of(self.current_slide)
    }
}
