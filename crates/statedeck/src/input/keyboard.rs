//! Keyboard mapping and the arrow hold-to-repeat gesture.
//!
//! An arrow press navigates at once and arms a hold timer. If the key is
//! still down when it fires, a repeating fast-flip timer takes over until the
//! key is released.

use super::{Command, Key};
use crate::engine::Direction;
use crate::engine::scheduler::{Scheduler, TimerId, TimerTask};
use crate::engine::settings::TimingSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Pressed {
        direction: Direction,
        hold: TimerId,
    },
    Held {
        direction: Direction,
        repeat: TimerId,
    },
}

impl Gesture {
    fn direction(self) -> Option<Direction> {
        match self {
            Gesture::Idle => None,
            Gesture::Pressed { direction, .. } | Gesture::Held { direction, .. } => {
                Some(direction)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    gesture: Gesture,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Translate a key press. Auto-repeat presses of the held arrow produce
    /// nothing; the hold timer drives repetition instead.
    pub fn key_down(
        &mut self,
        key: Key,
        now_ms: u64,
        timing: &TimingSettings,
        timers: &mut Scheduler<TimerTask>,
    ) -> Option<Command> {
        if let Some(direction) = key.arrow_direction() {
            if self.gesture.direction() == Some(direction) {
                return None;
            }
            self.cancel(timers);
            let hold = timers.once(now_ms, timing.key_hold_ms, TimerTask::KeyHold(direction));
            self.gesture = Gesture::Pressed { direction, hold };
            return Some(Command::Navigate(direction));
        }
        one_shot(key)
    }

    /// Releasing either arrow ends the gesture.
    pub fn key_up(&mut self, key: Key, timers: &mut Scheduler<TimerTask>) {
        if key.arrow_direction().is_some() {
            self.cancel(timers);
        }
    }

    /// The hold timer fired: switch to fast flipping. The first repeat comes
    /// one interval later.
    pub fn on_hold(
        &mut self,
        id: TimerId,
        now_ms: u64,
        timing: &TimingSettings,
        timers: &mut Scheduler<TimerTask>,
    ) {
        let Gesture::Pressed { direction, hold } = self.gesture else {
            return;
        };
        if hold != id {
            return;
        }
        let repeat = timers.repeating(now_ms, timing.fast_flip_ms, TimerTask::KeyRepeat(direction));
        self.gesture = Gesture::Held { direction, repeat };
        tracing::debug!(?direction, "key held, fast flipping");
    }

    /// A fast-flip tick. Returns the navigation to perform, if the tick
    /// belongs to the live gesture.
    pub fn on_repeat(&self, id: TimerId) -> Option<Command> {
        match self.gesture {
            Gesture::Held { direction, repeat } if repeat == id => {
                Some(Command::Navigate(direction))
            }
            _ => None,
        }
    }

    /// Drop the gesture and its timers.
    pub fn cancel(&mut self, timers: &mut Scheduler<TimerTask>) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Pressed { hold, .. } => {
                timers.cancel(hold);
            }
            Gesture::Held { repeat, .. } => {
                timers.cancel(repeat);
            }
        }
    }
}

fn one_shot(key: Key) -> Option<Command> {
    match key {
        Key::Space | Key::Char('l') => Some(Command::CycleState),
        Key::Enter => Some(Command::Navigate(Direction::Forward)),
        Key::Escape => Some(Command::First),
        Key::Char('p') => Some(Command::ToggleAutoPlay),
        Key::Char('r') => Some(Command::ResetProgress),
        Key::Char('n') => Some(Command::ToggleNote),
        Key::Char(c @ '1'..='9') => c.to_digit(10).map(|n| Command::GoTo(n as usize - 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Keyboard, Scheduler<TimerTask>, TimingSettings) {
        (Keyboard::new(), Scheduler::new(), TimingSettings::default())
    }

    #[test]
    fn test_one_shot_mapping() {
        let (mut kb, mut timers, timing) = setup();
        let mut press = |key| kb.key_down(key, 0, &timing, &mut timers);
        assert_eq!(press(Key::Space), Some(Command::CycleState));
        assert_eq!(press(Key::Char('l')), Some(Command::CycleState));
        assert_eq!(press(Key::Enter), Some(Command::Navigate(Direction::Forward)));
        assert_eq!(press(Key::Escape), Some(Command::First));
        assert_eq!(press(Key::Char('1')), Some(Command::GoTo(0)));
        assert_eq!(press(Key::Char('9')), Some(Command::GoTo(8)));
        assert_eq!(press(Key::Char('0')), None);
        assert_eq!(press(Key::Char('p')), Some(Command::ToggleAutoPlay));
        assert_eq!(press(Key::Char('r')), Some(Command::ResetProgress));
        assert_eq!(press(Key::Char('n')), Some(Command::ToggleNote));
        assert_eq!(press(Key::Tab), None);
    }

    #[test]
    fn test_arrow_press_navigates_and_arms_hold() {
        let (mut kb, mut timers, timing) = setup();
        let cmd = kb.key_down(Key::ArrowRight, 100, &timing, &mut timers);
        assert_eq!(cmd, Some(Command::Navigate(Direction::Forward)));
        assert!(matches!(kb.gesture(), Gesture::Pressed { direction: Direction::Forward, .. }));
        assert_eq!(timers.next_due(), Some(1100));
    }

    #[test]
    fn test_auto_repeat_of_held_arrow_is_ignored() {
        let (mut kb, mut timers, timing) = setup();
        kb.key_down(Key::ArrowLeft, 0, &timing, &mut timers);
        assert_eq!(kb.key_down(Key::ArrowLeft, 30, &timing, &mut timers), None);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_other_arrow_starts_fresh_gesture() {
        let (mut kb, mut timers, timing) = setup();
        kb.key_down(Key::ArrowLeft, 0, &timing, &mut timers);
        let cmd = kb.key_down(Key::ArrowRight, 500, &timing, &mut timers);
        assert_eq!(cmd, Some(Command::Navigate(Direction::Forward)));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_due(), Some(1500));
    }

    #[test]
    fn test_hold_then_repeat_until_release() {
        let (mut kb, mut timers, timing) = setup();
        kb.key_down(Key::ArrowRight, 0, &timing, &mut timers);

        let hold = timers.pop_due(1000).unwrap();
        kb.on_hold(hold.id, hold.due_ms, &timing, &mut timers);
        let tick = timers.pop_due(1150).unwrap();
        assert_eq!(kb.on_repeat(tick.id), Some(Command::Navigate(Direction::Forward)));

        kb.key_up(Key::ArrowRight, &mut timers);
        assert_eq!(kb.gesture(), Gesture::Idle);
        assert!(timers.is_empty());
        assert_eq!(kb.on_repeat(tick.id), None);
    }

    #[test]
    fn test_release_of_other_arrow_ends_gesture() {
        let (mut kb, mut timers, timing) = setup();
        kb.key_down(Key::ArrowRight, 0, &timing, &mut timers);
        kb.key_up(Key::ArrowLeft, &mut timers);
        assert_eq!(kb.gesture(), Gesture::Idle);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_stale_hold_is_ignored() {
        let (mut kb, mut timers, timing) = setup();
        kb.key_down(Key::ArrowRight, 0, &timing, &mut timers);
        let stale = timers.once(0, 1, TimerTask::KeyHold(Direction::Forward));
        kb.on_hold(stale, 1, &timing, &mut timers);
        assert!(matches!(kb.gesture(), Gesture::Pressed { .. }));
    }
}
