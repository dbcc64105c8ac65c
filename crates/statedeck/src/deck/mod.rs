//! Markdown deck files.
//!
//! A deck is a YAML header followed by slides. Inside a slide:
//!
//! ```text
//! @title: Parts
//! @label: 1.3
//! # Parts
//! ![Breadboard](img/breadboard.jpeg)
//! @note-title: Vendors
//! @note: Digikey
//! @state
//! - Resistors
//! - LEDs
//! ```
//!
//! `@state` starts the next content view of the same slide. Notes belong to
//! the state they are written in; `@title` and `@label` apply to the slide.

pub mod frontmatter;
pub mod splitter;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::engine::registry::{RegistryError, Slide, SlideRegistry};
use crate::engine::render::{Block, Note, SlideContent};
pub use frontmatter::DeckMeta;

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z][\w-]*):\s*(.*)$").expect("Invalid directive regex"));

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!\[([^\]]*)\]\(\s*([^)\s]+)\s*\)$").expect("Invalid image regex")
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]|\d+[.)])\s+(.*)$").expect("Invalid list regex"));

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("cannot read deck {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid deck header: {0}")]
    Header(#[from] serde_yaml::Error),

    #[error("deck has no slides")]
    Empty,
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<DeckSlide>,
    /// Directory that relative image paths are resolved against.
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckSlide {
    pub title: String,
    pub label: String,
    pub states: Vec<DeckState>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeckState {
    pub blocks: Vec<Block>,
    pub note: Option<Note>,
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let content = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        parse(&content, &base_dir)
    }

    pub fn title(&self) -> &str {
        self.meta.title.as_deref().unwrap_or("Untitled")
    }

    pub fn registry(&self) -> Result<SlideRegistry, RegistryError> {
        let slides = self
            .slides
            .iter()
            .map(|s| Slide::new(s.title.clone(), s.label.clone(), s.states.len()))
            .collect();
        SlideRegistry::new(slides)
    }

    /// One content provider per slide, in order.
    pub fn providers(&self) -> Vec<Box<dyn SlideContent>> {
        self.slides
            .iter()
            .cloned()
            .map(|s| Box::new(s) as Box<dyn SlideContent>)
            .collect()
    }

    /// Every image referenced by `slide`, across all of its states.
    pub fn image_paths(&self, slide: usize) -> Vec<PathBuf> {
        let Some(slide) = self.slides.get(slide) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = Vec::new();
        for block in slide.states.iter().flat_map(|s| &s.blocks) {
            if let Block::Image { path, .. } = block {
                let resolved = self.resolve(path);
                if !paths.contains(&resolved) {
                    paths.push(resolved);
                }
            }
        }
        paths
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }
}

impl SlideContent for DeckSlide {
    fn render_state(&self, state: usize) -> Vec<Block> {
        self.states
            .get(state)
            .map(|s| s.blocks.clone())
            .unwrap_or_default()
    }

    fn note(&self, state: usize) -> Option<Note> {
        self.states.get(state)?.note.clone()
    }
}

pub fn parse(content: &str, base_dir: &Path) -> Result<Deck, DeckError> {
    let (meta, body) = frontmatter::extract(content)?;
    let slides: Vec<DeckSlide> = splitter::split(&body)
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_slide(index, raw))
        .collect();
    if slides.is_empty() {
        return Err(DeckError::Empty);
    }
    Ok(Deck {
        meta,
        slides,
        base_dir: base_dir.to_path_buf(),
    })
}

fn parse_slide(index: usize, raw: &str) -> DeckSlide {
    let mut title = None;
    let mut label = None;
    let mut states = Vec::new();

    for section in splitter::split_states(raw) {
        let mut note_title = None;
        let mut note_lines = Vec::new();
        let mut content = Vec::new();
        let mut fence = splitter::Fence::default();

        for line in section.lines() {
            if fence.update(line.trim()) {
                content.push(line);
                continue;
            }
            let Some(caps) = DIRECTIVE.captures(line.trim()) else {
                content.push(line);
                continue;
            };
            let value = caps[2].trim().to_string();
            match &caps[1] {
                "title" => title = Some(value),
                "label" => label = Some(value),
                "note" => note_lines.push(value),
                "note-title" => note_title = Some(value),
                other => tracing::debug!(slide = index, directive = other, "unknown directive"),
            }
        }

        let note = (note_title.is_some() || !note_lines.is_empty()).then(|| Note {
            heading: note_title,
            lines: note_lines,
        });
        states.push(DeckState {
            blocks: parse_blocks(&content),
            note,
        });
    }

    let title = title
        .or_else(|| first_heading(&states))
        .unwrap_or_else(|| format!("Slide {}", index + 1));
    DeckSlide {
        title,
        label: label.unwrap_or_else(|| (index + 1).to_string()),
        states,
    }
}

fn first_heading(states: &[DeckState]) -> Option<String> {
    states.iter().flat_map(|s| &s.blocks).find_map(|b| match b {
        Block::Heading { text, .. } => Some(text.clone()),
        _ => None,
    })
}

/// Minimal block parsing: headings, lists, images, fenced code, paragraphs.
fn parse_blocks(lines: &[&str]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Vec<String> = Vec::new();
    let mut code: Vec<&str> = Vec::new();
    let mut fence = splitter::Fence::default();

    fn flush(blocks: &mut Vec<Block>, paragraph: &mut Vec<&str>, list: &mut Vec<String>) {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
        if !list.is_empty() {
            blocks.push(Block::List(std::mem::take(list)));
        }
    }

    for line in lines {
        let trimmed = line.trim();
        let was_open = fence.is_open();
        if fence.update(trimmed) {
            if !was_open {
                flush(&mut blocks, &mut paragraph, &mut list);
            } else if fence.is_open() {
                code.push(*line);
            } else {
                blocks.push(Block::Code(code.join("\n")));
                code.clear();
            }
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut blocks, &mut paragraph, &mut list);
        } else if let Some(heading) = parse_heading(trimmed) {
            flush(&mut blocks, &mut paragraph, &mut list);
            blocks.push(heading);
        } else if let Some(caps) = IMAGE.captures(trimmed) {
            flush(&mut blocks, &mut paragraph, &mut list);
            blocks.push(Block::Image {
                alt: caps[1].to_string(),
                path: caps[2].to_string(),
            });
        } else if let Some(caps) = LIST_ITEM.captures(trimmed) {
            if !paragraph.is_empty() {
                flush(&mut blocks, &mut paragraph, &mut list);
            }
            list.push(caps[1].to_string());
        } else {
            if !list.is_empty() {
                flush(&mut blocks, &mut paragraph, &mut list);
            }
            paragraph.push(trimmed);
        }
    }
    if fence.is_open() {
        blocks.push(Block::Code(code.join("\n")));
    }
    flush(&mut blocks, &mut paragraph, &mut list);
    blocks
}

fn parse_heading(line: &str) -> Option<Block> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?;
    Some(Block::Heading {
        level: level as u8,
        text: text.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LECTURE: &str = "---
title: Hardware Prototyping
---
# Welcome

---

@label: 1.3
# Parts
![Breadboard](img/breadboard.jpeg)
@note-title: Vendors
@note: Digikey
@note: Mouser
@state
- Resistors
- LEDs

---

@title: Fabrication
Three views.
@state
Second.
@state
```
@state
```
";

    fn lecture() -> Deck {
        parse(LECTURE, Path::new("/decks")).unwrap()
    }

    #[test]
    fn test_parses_slides_and_states() {
        let deck = lecture();
        assert_eq!(deck.title(), "Hardware Prototyping");
        let counts: Vec<usize> = deck.slides.iter().map(|s| s.states.len()).collect();
        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_titles_and_labels() {
        let deck = lecture();
        let registry = deck.registry().unwrap();
        let slides: Vec<(&str, &str)> = registry
            .iter()
            .map(|s| (s.title.as_str(), s.label.as_str()))
            .collect();
        assert_eq!(
            slides,
            vec![("Welcome", "1"), ("Parts", "1.3"), ("Fabrication", "3")]
        );
    }

    #[test]
    fn test_notes_belong_to_their_state() {
        let deck = lecture();
        let parts = &deck.slides[1];
        assert_eq!(
            parts.note(0),
            Some(Note {
                heading: Some("Vendors".to_string()),
                lines: vec!["Digikey".to_string(), "Mouser".to_string()],
            })
        );
        assert_eq!(parts.note(1), None);
    }

    #[test]
    fn test_blocks_per_state() {
        let deck = lecture();
        let parts = &deck.slides[1];
        assert_eq!(
            parts.render_state(0),
            vec![
                Block::Heading {
                    level: 1,
                    text: "Parts".to_string()
                },
                Block::Image {
                    alt: "Breadboard".to_string(),
                    path: "img/breadboard.jpeg".to_string()
                },
            ]
        );
        assert_eq!(
            parts.render_state(1),
            vec![Block::List(vec!["Resistors".to_string(), "LEDs".to_string()])]
        );
        assert!(parts.render_state(5).is_empty());
    }

    #[test]
    fn test_code_block_keeps_directive_text() {
        let deck = lecture();
        let fab = &deck.slides[2];
        assert_eq!(fab.render_state(2), vec![Block::Code("@state".to_string())]);
    }

    #[test]
    fn test_image_paths_resolve_against_deck_dir() {
        let deck = lecture();
        assert_eq!(
            deck.image_paths(1),
            vec![PathBuf::from("/decks/img/breadboard.jpeg")]
        );
        assert!(deck.image_paths(0).is_empty());
        assert!(deck.image_paths(9).is_empty());
    }

    #[test]
    fn test_empty_deck_is_an_error() {
        assert!(matches!(
            parse("---\ntitle: x\n---\n\n", Path::new(".")),
            Err(DeckError::Empty)
        ));
    }

    #[test]
    fn test_paragraph_lines_join() {
        let blocks = parse_blocks(&["one", "two", "", "three"]);
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("one two".to_string()),
                Block::Paragraph("three".to_string())
            ]
        );
    }
}
