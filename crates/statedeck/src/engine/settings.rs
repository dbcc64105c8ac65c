/// Timing of gestures and transient widgets, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingSettings {
    /// How long an arrow must stay down before fast flipping starts.
    pub key_hold_ms: u64,
    pub fast_flip_ms: u64,
    pub autoplay_ms: u64,
    pub progress_hide_ms: u64,
    pub buttons_hide_ms: u64,
    /// Hide delay once the pointer leaves a nav button.
    pub buttons_leave_ms: u64,
    /// `None` keeps the note open until dismissed.
    pub note_hide_ms: Option<u64>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            key_hold_ms: 1000,
            fast_flip_ms: 150,
            autoplay_ms: 5000,
            progress_hide_ms: 500,
            buttons_hide_ms: 2000,
            buttons_leave_ms: 1000,
            note_hide_ms: None,
        }
    }
}

/// Geometry thresholds for pointer, touch and gamepad input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    /// Width in pixels of the click bands at the left and right edge.
    pub click_zone_width: f32,
    /// Distance from an edge at which pointer movement reveals nav buttons.
    pub edge_threshold: f32,
    pub swipe_threshold: f32,
    /// Stick deflection that counts as a press.
    pub stick_press: f32,
    /// Stick deflection under which a press is released.
    pub stick_release: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            click_zone_width: 60.0,
            edge_threshold: 120.0,
            swipe_threshold: 50.0,
            stick_press: 0.7,
            stick_release: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub timing: TimingSettings,
    pub input: InputSettings,
}
