use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use crate::deck::Deck;
use crate::engine::registry::SlideRegistry;
use crate::engine::store::{FileStore, KeyValueStore, PersistenceStore};

#[derive(Debug, Serialize, PartialEq)]
struct SlideRow {
    number: usize,
    label: String,
    title: String,
    states: usize,
    /// Saved state, zero-based.
    saved_state: usize,
    current: bool,
}

#[derive(Debug, Serialize)]
struct Listing {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    state_file: PathBuf,
    slides: Vec<SlideRow>,
}

fn rows<S: KeyValueStore>(registry: &SlideRegistry, store: &PersistenceStore<S>) -> Vec<SlideRow> {
    let count = registry.slide_count();
    let current = store.load_current_slide(count);
    let states = store.load_slide_states(count);
    registry
        .iter()
        .enumerate()
        .map(|(i, slide)| SlideRow {
            number: i + 1,
            label: slide.label.clone(),
            title: slide.title.clone(),
            states: slide.max_states,
            saved_state: states.get(i).copied().unwrap_or(0).min(slide.max_states - 1),
            current: i == current,
        })
        .collect()
}

pub fn run(file: &Path, json: bool, state_file: Option<PathBuf>) -> anyhow::Result<()> {
    let deck = Deck::load(file)?;
    let registry = deck.registry()?;
    let state_path = FileStore::resolve_path(file, state_file)?;
    let store = PersistenceStore::new(FileStore::open(&state_path));

    let listing = Listing {
        title: deck.title().to_string(),
        author: deck.meta.author.clone(),
        state_file: state_path,
        slides: rows(&registry, &store),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    match &listing.author {
        Some(author) => println!("{} {}", listing.title.bold(), format!("by {author}").dimmed()),
        None => println!("{}", listing.title.bold()),
    }
    println!("{}", listing.state_file.display().to_string().dimmed());
    println!();
    let label_width = listing
        .slides
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    println!(
        "  {:>3}  {:<label_width$}  {:<7}  {}",
        "#".dimmed(),
        "label".dimmed(),
        "states".dimmed(),
        "title".dimmed(),
    );
    for row in &listing.slides {
        let marker = if row.current { "\u{25b6}".green() } else { " ".normal() };
        let states = if row.states > 1 {
            format!("{}/{}", row.saved_state + 1, row.states)
        } else {
            "-".to_string()
        };
        let line = format!(
            "{:>3}  {:<label_width$}  {:<7}  {}",
            row.number, row.label, states, row.title
        );
        if row.current {
            println!("{marker} {}", line.bold());
        } else {
            println!("{marker} {line}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::Slide;
    use crate::engine::store::MemoryStore;

    #[test]
    fn test_rows_mark_saved_position() {
        let registry = SlideRegistry::new(vec![
            Slide::new("Intro", "0", 1),
            Slide::new("Parts", "1.3", 2),
            Slide::new("Fabrication", "1.5", 3),
        ])
        .unwrap();
        let mut store = PersistenceStore::new(MemoryStore::new());
        store.save_current_slide(2);
        store.save_slide_states(&[0, 1, 2]);

        let rows = rows(&registry, &store);
        assert_eq!(rows.len(), 3);
        assert!(rows[2].current && !rows[0].current);
        assert_eq!(rows[1].saved_state, 1);
        assert_eq!(rows[1].label, "1.3");
        assert_eq!(rows[2].states, 3);
    }

    #[test]
    fn test_rows_without_saved_state() {
        let registry = SlideRegistry::new(vec![Slide::new("Only", "1", 2)]).unwrap();
        let store = PersistenceStore::new(MemoryStore::new());
        let rows = rows(&registry, &store);
        assert_eq!(
            rows,
            vec![SlideRow {
                number: 1,
                label: "1".to_string(),
                title: "Only".to_string(),
                states: 2,
                saved_state: 0,
                current: true,
            }]
        );
    }
}
