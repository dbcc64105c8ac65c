use thiserror::Error;

/// One addressable panel in the deck. Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub index: usize,
    pub title: String,
    /// Display number, e.g. "1.3".
    pub label: String,
    /// Number of alternate content views; 1 means the slide is stateless.
    pub max_states: usize,
}

impl Slide {
    pub fn new(title: impl Into<String>, label: impl Into<String>, max_states: usize) -> Self {
        Self {
            index: 0,
            title: title.into(),
            label: label.into(),
            max_states,
        }
    }

    pub fn is_stateful(&self) -> bool {
        self.max_states > 1
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("slide index {index} is out of range (deck has {count} slides)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("a deck needs at least one slide")]
    Empty,

    #[error("slide {index} declares zero states")]
    ZeroStates { index: usize },
}

/// Static ordered list of slides.
#[derive(Debug, Clone)]
pub struct SlideRegistry {
    slides: Vec<Slide>,
}

impl SlideRegistry {
    /// Indices are assigned by position, whatever the incoming slides carry.
    pub fn new(slides: Vec<Slide>) -> Result<Self, RegistryError> {
        if slides.is_empty() {
            return Err(RegistryError::Empty);
        }
        let slides: Vec<Slide> = slides
            .into_iter()
            .enumerate()
            .map(|(index, slide)| Slide { index, ..slide })
            .collect();
        if let Some(bad) = slides.iter().find(|s| s.max_states == 0) {
            return Err(RegistryError::ZeroStates { index: bad.index });
        }
        Ok(Self { slides })
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Result<&Slide, RegistryError> {
        self.slides
            .get(index)
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                count: self.slides.len(),
            })
    }

    /// State count for `index`, treating unknown slides as stateless.
    pub fn max_states(&self, index: usize) -> usize {
        self.slides.get(index).map_or(1, |s| s.max_states)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Move `delta` slides from `index`, wrapping at both ends.
    pub fn wrap(&self, index: usize, delta: isize) -> usize {
        let count = self.slides.len() as isize;
        (index as isize + delta).rem_euclid(count) as usize
    }

    /// Previous and next slide around `index`, with wraparound.
    pub fn neighbors(&self, index: usize) -> (usize, usize) {
        (self.wrap(index, -1), self.wrap(index, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(states: &[usize]) -> SlideRegistry {
        let slides = states
            .iter()
            .enumerate()
            .map(|(i, &n)| Slide::new(format!("Slide {i}"), i.to_string(), n))
            .collect();
        SlideRegistry::new(slides).unwrap()
    }

    #[test]
    fn test_indices_follow_position() {
        let reg = registry(&[1, 2, 3]);
        let indices: Vec<usize> = reg.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(reg.slide_count(), 3);
    }

    #[test]
    fn test_out_of_range_lookup_fails() {
        let reg = registry(&[1, 1]);
        assert_eq!(
            reg.slide(2),
            Err(RegistryError::IndexOutOfRange { index: 2, count: 2 })
        );
        assert_eq!(reg.max_states(9), 1);
    }

    #[test]
    fn test_rejects_empty_and_zero_state_slides() {
        assert_eq!(SlideRegistry::new(vec![]).unwrap_err(), RegistryError::Empty);
        let err = SlideRegistry::new(vec![Slide::new("a", "0", 1), Slide::new("b", "1", 0)])
            .unwrap_err();
        assert_eq!(err, RegistryError::ZeroStates { index: 1 });
    }

    #[test]
    fn test_neighbors_wrap() {
        let reg = registry(&[1; 18]);
        assert_eq!(reg.neighbors(0), (17, 1));
        assert_eq!(reg.neighbors(17), (16, 0));
        assert_eq!(reg.neighbors(5), (4, 6));
    }

    #[test]
    fn test_single_slide_neighbors_are_itself() {
        let reg = registry(&[3]);
        assert_eq!(reg.neighbors(0), (0, 0));
        assert!(reg.slide(0).unwrap().is_stateful());
    }
}
