//! Render dispatch: (slide, state) to a content descriptor for the view.

/// A piece of slide content, already resolved for one state.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    List(Vec<String>),
    Image { alt: String, path: String },
    Code(String),
}

/// What the view should show for the current slide.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub slide: usize,
    pub state: usize,
    pub blocks: Vec<Block>,
}

/// Annotation shown beside a slide in a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

/// Per-slide content provider.
pub trait SlideContent {
    fn render_state(&self, state: usize) -> Vec<Block>;
    fn note(&self, state: usize) -> Option<Note>;
}

/// Asset preparation hooks, called after every navigation. Fire-and-forget.
pub trait AssetLoader {
    fn load_for_slide(&mut self, slide: usize);
    fn preload_adjacent(&mut self, prev: usize, next: usize);
}

/// Strategy table from slide index to its content provider.
pub struct RenderDispatcher {
    providers: Vec<Box<dyn SlideContent>>,
}

impl RenderDispatcher {
    pub fn new(providers: Vec<Box<dyn SlideContent>>) -> Self {
        Self { providers }
    }

    /// Ask the slide's provider for `state`. A slide without a provider is
    /// logged and skipped.
    pub fn render(&self, slide: usize, state: usize) -> Option<RenderFrame> {
        let Some(provider) = self.providers.get(slide) else {
            tracing::warn!(slide, "no content registered for slide, skipping render");
            return None;
        };
        tracing::trace!(slide, state, "render");
        Some(RenderFrame {
            slide,
            state,
            blocks: provider.render_state(state),
        })
    }

    pub fn note(&self, slide: usize, state: usize) -> Option<Note> {
        self.providers.get(slide)?.note(state)
    }
}

impl std::fmt::Debug for RenderDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDispatcher")
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Labels(&'static [&'static str]);

    impl SlideContent for Labels {
        fn render_state(&self, state: usize) -> Vec<Block> {
            vec![Block::Paragraph(self.0[state].to_string())]
        }

        fn note(&self, state: usize) -> Option<Note> {
            (state == 1).then(|| Note {
                heading: Some("Vendors".to_string()),
                lines: vec!["Adafruit".to_string()],
            })
        }
    }

    #[test]
    fn test_dispatches_to_slide_provider() {
        let dispatcher = RenderDispatcher::new(vec![
            Box::new(Labels(&["intro"])),
            Box::new(Labels(&["image view", "text view"])),
        ]);
        let frame = dispatcher.render(1, 1).unwrap();
        assert_eq!(frame.slide, 1);
        assert_eq!(frame.state, 1);
        assert_eq!(frame.blocks, vec![Block::Paragraph("text view".to_string())]);
        assert!(dispatcher.note(1, 1).is_some());
        assert!(dispatcher.note(1, 0).is_none());
    }

    #[test]
    fn test_missing_provider_is_skipped() {
        let dispatcher = RenderDispatcher::new(vec![Box::new(Labels(&["only"]))]);
        assert!(dispatcher.render(3, 0).is_none());
        assert!(dispatcher.note(3, 0).is_none());
    }
}
