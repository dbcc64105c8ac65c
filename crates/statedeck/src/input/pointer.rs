//! Click zones and edge hover.

use super::Command;
use crate::engine::Direction;
use crate::engine::settings::InputSettings;

/// Interactive overlay elements. Clicks on them bypass the zone logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeTarget {
    NavButton(Direction),
    ProgressDot(usize),
    NotePanel,
    NoteClose,
}

/// What sits under the pointer at click time, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Chrome(ChromeTarget),
    /// Empty layout space inside a slide.
    Blank,
    /// Text, images and other content.
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub x: f32,
    pub viewport_width: f32,
    pub target: ClickTarget,
}

/// Map a left click to a command.
pub fn click(click: Click, input: &InputSettings) -> Option<Command> {
    match click.target {
        ClickTarget::Chrome(chrome) => chrome_click(chrome),
        target => {
            if click.x < input.click_zone_width {
                Some(Command::Navigate(Direction::Back))
            } else if click.x > click.viewport_width - input.click_zone_width {
                Some(Command::Navigate(Direction::Forward))
            } else if target == ClickTarget::Blank {
                Some(Command::CycleState)
            } else {
                None
            }
        }
    }
}

fn chrome_click(target: ChromeTarget) -> Option<Command> {
    match target {
        ChromeTarget::NavButton(direction) => Some(Command::Navigate(direction)),
        ChromeTarget::ProgressDot(index) => Some(Command::GoTo(index)),
        ChromeTarget::NoteClose => Some(Command::HideNote),
        ChromeTarget::NotePanel => None,
    }
}

/// Whether pointer movement at `x` should reveal the nav buttons.
pub fn near_edge(x: f32, viewport_width: f32, input: &InputSettings) -> bool {
    x < input.edge_threshold || x > viewport_width - input.edge_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, target: ClickTarget) -> Option<Command> {
        click(
            Click {
                x,
                viewport_width: 1920.0,
                target,
            },
            &InputSettings::default(),
        )
    }

    #[test]
    fn test_edge_bands_navigate() {
        assert_eq!(at(30.0, ClickTarget::Content), Some(Command::Navigate(Direction::Back)));
        assert_eq!(at(1900.0, ClickTarget::Blank), Some(Command::Navigate(Direction::Forward)));
    }

    #[test]
    fn test_band_boundaries_are_exclusive() {
        assert_eq!(at(60.0, ClickTarget::Content), None);
        assert_eq!(at(1860.0, ClickTarget::Content), None);
        assert_eq!(at(1860.5, ClickTarget::Content), Some(Command::Navigate(Direction::Forward)));
    }

    #[test]
    fn test_middle_cycles_only_on_blank() {
        assert_eq!(at(960.0, ClickTarget::Blank), Some(Command::CycleState));
        assert_eq!(at(960.0, ClickTarget::Content), None);
    }

    #[test]
    fn test_chrome_bypasses_zones() {
        let dot = ClickTarget::Chrome(ChromeTarget::ProgressDot(3));
        assert_eq!(at(10.0, dot), Some(Command::GoTo(3)));
        let close = ClickTarget::Chrome(ChromeTarget::NoteClose);
        assert_eq!(at(1910.0, close), Some(Command::HideNote));
        let panel = ClickTarget::Chrome(ChromeTarget::NotePanel);
        assert_eq!(at(960.0, panel), None);
        let prev = ClickTarget::Chrome(ChromeTarget::NavButton(Direction::Back));
        assert_eq!(at(1900.0, prev), Some(Command::Navigate(Direction::Back)));
    }

    #[test]
    fn test_near_edge() {
        let input = InputSettings::default();
        assert!(near_edge(119.0, 1920.0, &input));
        assert!(near_edge(1801.0, 1920.0, &input));
        assert!(!near_edge(960.0, 1920.0, &input));
    }
}
