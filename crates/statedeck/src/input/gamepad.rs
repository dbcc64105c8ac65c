//! Gamepad polling with edge-triggered controls.
//!
//! The source reports one snapshot per frame; the tracker remembers what was
//! already down so that holding a control fires it only once.

use super::Command;
use crate::engine::Direction;
use crate::engine::settings::InputSettings;

/// Raw control readings for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadSnapshot {
    pub dpad_left: bool,
    pub dpad_right: bool,
    /// Left stick horizontal axis in `[-1, 1]`.
    pub stick_x: f32,
    pub shoulder: bool,
    pub trigger: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GamepadEvent {
    Connected(String),
    Disconnected(String),
    Frame(GamepadSnapshot),
}

/// Anything that can be polled for gamepad events once per frame.
pub trait GamepadSource {
    fn poll(&mut self) -> Vec<GamepadEvent>;
}

#[derive(Debug, Clone, Copy, Default)]
struct Latches {
    left: bool,
    right: bool,
    stick_left: bool,
    stick_right: bool,
    shoulder: bool,
    trigger: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GamepadTracker {
    connected: Option<String>,
    latches: Latches,
}

impl GamepadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    pub fn handle(&mut self, event: GamepadEvent, input: &InputSettings) -> Vec<Command> {
        match event {
            GamepadEvent::Connected(name) => {
                tracing::info!(gamepad = %name, "gamepad connected");
                self.connected = Some(name);
                self.latches = Latches::default();
                Vec::new()
            }
            GamepadEvent::Disconnected(name) => {
                tracing::info!(gamepad = %name, "gamepad disconnected");
                self.connected = None;
                self.latches = Latches::default();
                Vec::new()
            }
            GamepadEvent::Frame(snapshot) if self.is_connected() => self.poll(snapshot, input),
            GamepadEvent::Frame(_) => Vec::new(),
        }
    }

    fn poll(&mut self, pad: GamepadSnapshot, input: &InputSettings) -> Vec<Command> {
        let mut commands = Vec::new();
        let back = Command::Navigate(Direction::Back);
        let forward = Command::Navigate(Direction::Forward);
        let l = &mut self.latches;

        if rising(&mut l.left, pad.dpad_left) {
            commands.push(back);
        }
        if rising(&mut l.right, pad.dpad_right) {
            commands.push(forward);
        }

        if pad.stick_x < -input.stick_press && !l.stick_left {
            l.stick_left = true;
            commands.push(back);
        } else if pad.stick_x > -input.stick_release {
            l.stick_left = false;
        }
        if pad.stick_x > input.stick_press && !l.stick_right {
            l.stick_right = true;
            commands.push(forward);
        } else if pad.stick_x < input.stick_release {
            l.stick_right = false;
        }

        if rising(&mut l.shoulder, pad.shoulder) {
            commands.push(Command::CycleState);
        }
        if rising(&mut l.trigger, pad.trigger) {
            commands.push(Command::CycleState);
        }

        if !commands.is_empty() {
            tracing::debug!(?commands, "gamepad input");
        }
        commands
    }
}

/// Update `latch` to `pressed`, reporting a fresh press.
fn rising(latch: &mut bool, pressed: bool) -> bool {
    let fired = pressed && !*latch;
    *latch = pressed;
    fired
}

/// Gamepad backend on top of gilrs. Follows the first connected pad.
pub struct GilrsSource {
    gilrs: gilrs::Gilrs,
    active: Option<gilrs::GamepadId>,
    announced: bool,
}

impl GilrsSource {
    pub fn new() -> anyhow::Result<Self> {
        let gilrs = gilrs::Gilrs::new()
            .map_err(|e| anyhow::anyhow!("Gamepad support unavailable: {e}"))?;
        let active = gilrs.gamepads().map(|(id, _)| id).next();
        Ok(Self {
            gilrs,
            active,
            announced: false,
        })
    }

    fn snapshot(&self, id: gilrs::GamepadId) -> GamepadSnapshot {
        use gilrs::{Axis, Button};
        let pad = self.gilrs.gamepad(id);
        GamepadSnapshot {
            dpad_left: pad.is_pressed(Button::DPadLeft),
            dpad_right: pad.is_pressed(Button::DPadRight),
            stick_x: pad.value(Axis::LeftStickX),
            shoulder: pad.is_pressed(Button::LeftTrigger),
            trigger: pad.is_pressed(Button::LeftTrigger2),
        }
    }

    fn name(&self, id: gilrs::GamepadId) -> String {
        self.gilrs.gamepad(id).name().to_string()
    }
}

impl GamepadSource for GilrsSource {
    fn poll(&mut self) -> Vec<GamepadEvent> {
        let mut events = Vec::new();
        if !self.announced {
            self.announced = true;
            if let Some(id) = self.active {
                events.push(GamepadEvent::Connected(self.name(id)));
            }
        }

        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                gilrs::EventType::Connected if self.active.is_none() => {
                    self.active = Some(event.id);
                    events.push(GamepadEvent::Connected(self.name(event.id)));
                }
                gilrs::EventType::Disconnected if self.active == Some(event.id) => {
                    self.active = None;
                    events.push(GamepadEvent::Disconnected(self.name(event.id)));
                }
                _ => {}
            }
        }

        if let Some(id) = self.active {
            events.push(GamepadEvent::Frame(self.snapshot(id)));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected() -> GamepadTracker {
        let mut tracker = GamepadTracker::new();
        tracker.handle(GamepadEvent::Connected("pad".into()), &InputSettings::default());
        tracker
    }

    fn frame(tracker: &mut GamepadTracker, pad: GamepadSnapshot) -> Vec<Command> {
        tracker.handle(GamepadEvent::Frame(pad), &InputSettings::default())
    }

    #[test]
    fn test_dpad_fires_once_per_press() {
        let mut t = connected();
        let held = GamepadSnapshot {
            dpad_right: true,
            ..Default::default()
        };
        assert_eq!(frame(&mut t, held), vec![Command::Navigate(Direction::Forward)]);
        assert!(frame(&mut t, held).is_empty());
        assert!(frame(&mut t, GamepadSnapshot::default()).is_empty());
        assert_eq!(frame(&mut t, held), vec![Command::Navigate(Direction::Forward)]);
    }

    #[test]
    fn test_stick_rearms_only_inside_release_zone() {
        let mut t = connected();
        let stick = |x| GamepadSnapshot {
            stick_x: x,
            ..Default::default()
        };
        assert_eq!(frame(&mut t, stick(-0.8)), vec![Command::Navigate(Direction::Back)]);
        // Between release and press: still latched.
        assert!(frame(&mut t, stick(-0.6)).is_empty());
        assert!(frame(&mut t, stick(-0.8)).is_empty());
        assert!(frame(&mut t, stick(-0.4)).is_empty());
        assert_eq!(frame(&mut t, stick(-0.8)), vec![Command::Navigate(Direction::Back)]);
        assert_eq!(frame(&mut t, stick(0.75)), vec![Command::Navigate(Direction::Forward)]);
    }

    #[test]
    fn test_shoulder_and_trigger_cycle_state() {
        let mut t = connected();
        let both = GamepadSnapshot {
            shoulder: true,
            trigger: true,
            ..Default::default()
        };
        assert_eq!(frame(&mut t, both), vec![Command::CycleState, Command::CycleState]);
    }

    #[test]
    fn test_frames_ignored_until_connected_and_after_disconnect() {
        let mut t = GamepadTracker::new();
        let pressed = GamepadSnapshot {
            dpad_left: true,
            ..Default::default()
        };
        assert!(frame(&mut t, pressed).is_empty());

        t.handle(GamepadEvent::Connected("pad".into()), &InputSettings::default());
        assert_eq!(frame(&mut t, pressed).len(), 1);
        t.handle(GamepadEvent::Disconnected("pad".into()), &InputSettings::default());
        assert!(!t.is_connected());
        assert!(frame(&mut t, pressed).is_empty());

        // Reconnecting starts with clear latches.
        t.handle(GamepadEvent::Connected("pad".into()), &InputSettings::default());
        assert_eq!(frame(&mut t, pressed).len(), 1);
    }
}
