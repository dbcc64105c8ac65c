mod navigation;

use super::{InputEvent, Session};
use crate::engine::settings::EngineSettings;
use crate::engine::store::MemoryStore;
use crate::engine::testing::{RecordingAssets, presenter_with};
use crate::input::Key;

type TestSession = Session<MemoryStore, RecordingAssets>;

/// Session over a deck whose slides have the given state counts.
fn session(states: &[usize]) -> TestSession {
    session_with(states, MemoryStore::new())
}

/// Session started from previously saved storage.
fn session_with(states: &[usize], backend: MemoryStore) -> TestSession {
    Session::new(presenter_with(states, backend), EngineSettings::default(), 0)
}

/// The storage a relaunch would read.
fn saved(s: &TestSession) -> MemoryStore {
    s.presenter().store().backend().clone()
}

fn press(s: &mut TestSession, key: Key, now: u64) {
    s.handle(InputEvent::KeyDown(key), now);
}

fn release(s: &mut TestSession, key: Key, now: u64) {
    s.handle(InputEvent::KeyUp(key), now);
}

/// Press and release at the same instant.
fn tap(s: &mut TestSession, key: Key, now: u64) {
    press(s, key, now);
    release(s, key, now);
}

/// Current slide and its state.
fn position(s: &TestSession) -> (usize, usize) {
    (s.presenter().current_slide(), s.presenter().current_state())
}
