//! Test doubles shared by engine and session tests.

use super::presenter::Presenter;
use super::registry::{Slide, SlideRegistry};
use super::render::{AssetLoader, Block, Note, RenderDispatcher, SlideContent};
use super::store::{MemoryStore, PersistenceStore};

/// Content that names its own slide and state. State 1 of a stateful slide
/// carries a note.
pub(crate) struct Echo {
    slide: usize,
    states: usize,
}

impl SlideContent for Echo {
    fn render_state(&self, state: usize) -> Vec<Block> {
        vec![Block::Paragraph(format!("slide {} state {state}", self.slide))]
    }

    fn note(&self, state: usize) -> Option<Note> {
        (self.states > 1 && state == 1).then(|| Note {
            heading: None,
            lines: vec![format!("note for slide {}", self.slide)],
        })
    }
}

/// Records every asset call as `(slide, None)` or `(prev, Some(next))`.
#[derive(Debug, Default)]
pub(crate) struct RecordingAssets {
    pub(crate) calls: Vec<(usize, Option<usize>)>,
}

impl AssetLoader for RecordingAssets {
    fn load_for_slide(&mut self, slide: usize) {
        self.calls.push((slide, None));
    }

    fn preload_adjacent(&mut self, prev: usize, next: usize) {
        self.calls.push((prev, Some(next)));
    }
}

pub(crate) fn deck(states: &[usize]) -> (SlideRegistry, RenderDispatcher) {
    let slides = states
        .iter()
        .enumerate()
        .map(|(i, &n)| Slide::new(format!("Slide {i}"), i.to_string(), n))
        .collect();
    let providers: Vec<Box<dyn SlideContent>> = states
        .iter()
        .enumerate()
        .map(|(slide, &states)| Box::new(Echo { slide, states }) as Box<dyn SlideContent>)
        .collect();
    let registry = SlideRegistry::new(slides).expect("test deck is valid");
    (registry, RenderDispatcher::new(providers))
}

pub(crate) fn presenter_with(
    states: &[usize],
    backend: MemoryStore,
) -> Presenter<MemoryStore, RecordingAssets> {
    let (registry, dispatcher) = deck(states);
    Presenter::new(
        registry,
        dispatcher,
        PersistenceStore::new(backend),
        RecordingAssets::default(),
    )
}

pub(crate) fn presenter(states: &[usize]) -> Presenter<MemoryStore, RecordingAssets> {
    presenter_with(states, MemoryStore::new())
}
