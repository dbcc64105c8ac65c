//! Navigation and state controllers.
//!
//! Every mutation follows the same order: update the in-memory state, write
//! it through to storage, then re-render. The presenter is the only writer of
//! `PresentationState`.

use super::registry::{Slide, SlideRegistry};
use super::render::{AssetLoader, Note, RenderDispatcher, RenderFrame};
use super::state::PresentationState;
use super::store::{KeyValueStore, PersistenceStore};

pub struct Presenter<S, A> {
    registry: SlideRegistry,
    dispatcher: RenderDispatcher,
    store: PersistenceStore<S>,
    assets: A,
    state: PresentationState,
    frame: Option<RenderFrame>,
    note: Option<Note>,
}

impl<S: KeyValueStore, A: AssetLoader> Presenter<S, A> {
    /// Restore the saved position and render it. The restored slide keeps its
    /// saved state; the reset-on-entry rule only applies to navigation.
    pub fn new(
        registry: SlideRegistry,
        dispatcher: RenderDispatcher,
        store: PersistenceStore<S>,
        assets: A,
    ) -> Self {
        let state = PresentationState::new(registry.slide_count());
        let mut presenter = Self {
            registry,
            dispatcher,
            store,
            assets,
            state,
            frame: None,
            note: None,
        };
        presenter.reload();
        presenter
    }

    /// Re-read storage and redraw, as a page reload would.
    pub fn reload(&mut self) {
        let count = self.registry.slide_count();
        let current = self.store.load_current_slide(count);
        let states = self.store.load_slide_states(count);
        self.state = PresentationState::restore(&self.registry, current, states);
        tracing::debug!(
            slide = self.state.current_slide(),
            states = ?self.state.slide_states(),
            "restored position"
        );
        self.render_current();
        self.refresh_note();
        self.prepare_assets(self.state.current_slide());
    }

    /// Move by `delta` slides with wraparound. Returns the new index.
    pub fn change_slide(&mut self, delta: isize) -> usize {
        let target = self.registry.wrap(self.state.current_slide, delta);
        self.enter_slide(target);
        target
    }

    /// Jump to `index`. Out-of-range targets are ignored and return `false`.
    pub fn go_to_slide(&mut self, index: usize) -> bool {
        if index >= self.registry.slide_count() {
            tracing::debug!(index, "ignoring jump to missing slide");
            return false;
        }
        self.enter_slide(index);
        true
    }

    fn enter_slide(&mut self, target: usize) {
        let previous = self.state.current_slide;
        self.frame = None;
        self.state.current_slide = target;
        tracing::debug!(from = previous, to = target, "change slide");

        self.reset_state(target);
        self.store.save_current_slide(target);
        self.refresh_note();
        self.prepare_assets(target);
    }

    /// Advance the current slide's state, wrapping at its state count.
    /// Stateless slides are left alone and report `false`.
    pub fn cycle_state(&mut self) -> bool {
        let slide = self.state.current_slide;
        let max = self.registry.max_states(slide);
        if max <= 1 {
            tracing::debug!(slide, "slide has no additional states");
            return false;
        }
        let next = (self.state.slide_states[slide] + 1) % max;
        self.state.slide_states[slide] = next;
        tracing::debug!(slide, state = next, "cycle state");

        self.store.save_slide_states(&self.state.slide_states);
        self.render_current();
        self.refresh_note();
        true
    }

    /// Force slide `index` back to its first state.
    pub fn reset_state(&mut self, index: usize) {
        let Some(slot) = self.state.slide_states.get_mut(index) else {
            tracing::warn!(index, "cannot reset state of missing slide");
            return;
        };
        *slot = 0;
        self.store.save_slide_states(&self.state.slide_states);
        if index == self.state.current_slide {
            self.render_current();
        }
    }

    /// Drop saved progress and start over from the defaults.
    pub fn reset_progress(&mut self) {
        tracing::info!("clearing saved progress");
        self.store.clear_all();
        self.reload();
    }

    /// Look up the note for the current (slide, state) again.
    pub fn refresh_note(&mut self) -> Option<&Note> {
        self.note = self
            .dispatcher
            .note(self.state.current_slide, self.state.current_state());
        self.note.as_ref()
    }

    fn render_current(&mut self) {
        self.frame = self
            .dispatcher
            .render(self.state.current_slide, self.state.current_state());
    }

    fn prepare_assets(&mut self, slide: usize) {
        let (prev, next) = self.registry.neighbors(slide);
        self.assets.load_for_slide(slide);
        self.assets.preload_adjacent(prev, next);
    }

    pub fn registry(&self) -> &SlideRegistry {
        &self.registry
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn current_slide(&self) -> usize {
        self.state.current_slide
    }

    pub fn current_state(&self) -> usize {
        self.state.current_state()
    }

    /// Registry entry of the current slide.
    pub fn slide(&self) -> Option<&Slide> {
        self.registry.slide(self.state.current_slide).ok()
    }

    pub fn frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }

    pub fn note(&self) -> Option<&Note> {
        self.note.as_ref()
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    #[cfg(test)]
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    #[cfg(test)]
    pub fn store(&self) -> &PersistenceStore<S> {
        &self.store
    }
}
