use super::*;
use crate::engine::feedback::Widget;
use crate::engine::store::{CURRENT_SLIDE_KEY, KeyValueStore, SLIDE_STATES_KEY};
use crate::input::Command;

/// Eighteen slides; slide 4 has two states like the "Parts" slide.
fn lecture() -> Vec<usize> {
    let mut states = vec![1; 18];
    states[4] = 2;
    states[6] = 3;
    states
}

#[test]
fn next_from_last_slide_wraps_to_first() {
    let mut backend = MemoryStore::new();
    backend.set(CURRENT_SLIDE_KEY, "17".to_string()).unwrap();
    let mut s = session_with(&lecture(), backend);
    assert_eq!(position(&s), (17, 0));

    tap(&mut s, Key::Enter, 10);
    assert_eq!(position(&s), (0, 0));

    let stored = saved(&s);
    assert_eq!(stored.get(CURRENT_SLIDE_KEY).as_deref(), Some("0"));
    let states: Vec<usize> =
        serde_json::from_str(&stored.get(SLIDE_STATES_KEY).unwrap()).unwrap();
    assert_eq!(states, vec![0; 18]);
}

#[test]
fn previous_from_first_slide_wraps_to_last() {
    let mut s = session(&lecture());
    tap(&mut s, Key::ArrowLeft, 0);
    assert_eq!(position(&s), (17, 0));
}

#[test]
fn space_cycles_two_state_slide() {
    let mut s = session(&lecture());
    tap(&mut s, Key::Char('5'), 0);
    assert_eq!(position(&s), (4, 0));

    let mut seen = Vec::new();
    for t in 1..=3 {
        tap(&mut s, Key::Space, t * 10);
        seen.push(s.presenter().current_state());
    }
    assert_eq!(seen, vec![1, 0, 1]);
}

#[test]
fn cycling_stateless_slide_changes_nothing() {
    let mut s = session(&lecture());
    tap(&mut s, Key::Char('l'), 0);
    assert_eq!(position(&s), (0, 0));
    assert_eq!(saved(&s).get(SLIDE_STATES_KEY), None);
}

#[test]
fn returning_to_slide_shows_first_state() {
    let mut s = session(&lecture());
    s.apply(Command::GoTo(6), 0);
    tap(&mut s, Key::Space, 10);
    tap(&mut s, Key::Space, 20);
    assert_eq!(position(&s), (6, 2));

    tap(&mut s, Key::ArrowRight, 30);
    tap(&mut s, Key::ArrowLeft, 40);
    assert_eq!(position(&s), (6, 0));
}

#[test]
fn digits_jump_and_ignore_missing_slides() {
    let mut s = session(&[1, 2, 1]);
    tap(&mut s, Key::Char('3'), 0);
    assert_eq!(position(&s), (2, 0));
    tap(&mut s, Key::Char('9'), 10);
    assert_eq!(position(&s), (2, 0));
    assert!(s.is_visible(Widget::Progress));
}

#[test]
fn escape_returns_to_first_slide() {
    let mut s = session(&lecture());
    tap(&mut s, Key::Char('8'), 0);
    tap(&mut s, Key::Escape, 10);
    assert_eq!(position(&s), (0, 0));
}

#[test]
fn tab_is_ignored() {
    let mut s = session(&lecture());
    tap(&mut s, Key::Tab, 0);
    assert_eq!(position(&s), (0, 0));
    assert!(!s.is_visible(Widget::Progress));
}

#[test]
fn progress_flashes_after_navigation() {
    let mut s = session(&lecture());
    assert!(!s.is_visible(Widget::Progress));
    tap(&mut s, Key::Enter, 1000);
    assert!(s.is_visible(Widget::Progress));
    s.tick(1399);
    assert!(s.is_visible(Widget::Progress));

    // A second navigation restarts the countdown.
    tap(&mut s, Key::Enter, 1400);
    s.tick(1899);
    assert!(s.is_visible(Widget::Progress));
    s.tick(1900);
    assert!(!s.is_visible(Widget::Progress));
}

#[test]
fn note_follows_slide_and_state() {
    let mut s = session(&[1, 2, 1]);
    assert!(!s.is_visible(Widget::Note));

    tap(&mut s, Key::ArrowRight, 0);
    tap(&mut s, Key::Space, 10);
    assert!(s.is_visible(Widget::Note));

    // Sticky by default.
    s.tick(60_000);
    assert!(s.is_visible(Widget::Note));

    tap(&mut s, Key::ArrowRight, 60_010);
    assert!(!s.is_visible(Widget::Note));
}

#[test]
fn note_toggle_and_close() {
    let mut s = session(&[2]);
    tap(&mut s, Key::Space, 0);
    assert!(s.is_visible(Widget::Note));
    tap(&mut s, Key::Char('n'), 10);
    assert!(!s.is_visible(Widget::Note));
    tap(&mut s, Key::Char('n'), 20);
    assert!(s.is_visible(Widget::Note));
    s.apply(Command::HideNote, 30);
    assert!(!s.is_visible(Widget::Note));

    // Nothing to show on a state without a note.
    tap(&mut s, Key::Space, 40);
    tap(&mut s, Key::Char('n'), 50);
    assert!(!s.is_visible(Widget::Note));
}

#[test]
fn note_auto_hides_when_configured() {
    let mut settings = EngineSettings::default();
    settings.timing.note_hide_ms = Some(3000);
    let mut s = Session::new(presenter_with(&[2], MemoryStore::new()), settings, 0);
    tap(&mut s, Key::Space, 100);
    assert!(s.is_visible(Widget::Note));
    s.tick(3099);
    assert!(s.is_visible(Widget::Note));
    s.tick(3100);
    assert!(!s.is_visible(Widget::Note));
}

