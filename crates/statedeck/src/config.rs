use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::settings::{EngineSettings, InputSettings, TimingSettings};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "statedeck";

pub const VALID_KEYS: &[&str] = &[
    "defaults.theme",
    "timing.key_hold_ms",
    "timing.fast_flip_ms",
    "timing.autoplay_ms",
    "timing.progress_hide_ms",
    "timing.buttons_hide_ms",
    "timing.buttons_leave_ms",
    "timing.note_hide",
    "input.click_zone_width",
    "input.edge_threshold",
    "input.swipe_threshold",
    "input.stick_press",
    "input.stick_release",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_hold_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_flip_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_hide_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons_hide_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons_leave_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_hide: Option<NoteHide>,
}

/// How long a slide note stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteHide {
    Sticky(Sticky),
    After(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sticky {
    Sticky,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_zone_width: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stick_press: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stick_release: Option<f32>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `statedeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    /// A missing file means defaults; a file that exists but cannot be read
    /// or parsed is reported before falling back.
    pub fn load_from_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# statedeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref()?.theme.as_deref()
    }

    /// Engine settings with every unset value taken from the defaults.
    pub fn settings(&self) -> EngineSettings {
        let mut timing = TimingSettings::default();
        if let Some(t) = &self.timing {
            timing.key_hold_ms = t.key_hold_ms.unwrap_or(timing.key_hold_ms);
            timing.fast_flip_ms = t.fast_flip_ms.unwrap_or(timing.fast_flip_ms);
            timing.autoplay_ms = t.autoplay_ms.unwrap_or(timing.autoplay_ms);
            timing.progress_hide_ms = t.progress_hide_ms.unwrap_or(timing.progress_hide_ms);
            timing.buttons_hide_ms = t.buttons_hide_ms.unwrap_or(timing.buttons_hide_ms);
            timing.buttons_leave_ms = t.buttons_leave_ms.unwrap_or(timing.buttons_leave_ms);
            match t.note_hide {
                Some(NoteHide::After(ms)) => timing.note_hide_ms = Some(ms),
                Some(NoteHide::Sticky(_)) | None => {}
            }
        }

        let mut input = InputSettings::default();
        if let Some(i) = &self.input {
            input.click_zone_width = i.click_zone_width.unwrap_or(input.click_zone_width);
            input.edge_threshold = i.edge_threshold.unwrap_or(input.edge_threshold);
            input.swipe_threshold = i.swipe_threshold.unwrap_or(input.swipe_threshold);
            input.stick_press = i.stick_press.unwrap_or(input.stick_press);
            input.stick_release = i.stick_release.unwrap_or(input.stick_release);
        }

        EngineSettings { timing, input }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "timing.note_hide" => {
                let hide = if value == "sticky" {
                    NoteHide::Sticky(Sticky::Sticky)
                } else {
                    NoteHide::After(parse_millis(key, value)?)
                };
                self.timing_mut().note_hide = Some(hide);
            }
            "timing.key_hold_ms" => self.timing_mut().key_hold_ms = Some(parse_millis(key, value)?),
            "timing.fast_flip_ms" => {
                self.timing_mut().fast_flip_ms = Some(parse_millis(key, value)?)
            }
            "timing.autoplay_ms" => self.timing_mut().autoplay_ms = Some(parse_millis(key, value)?),
            "timing.progress_hide_ms" => {
                self.timing_mut().progress_hide_ms = Some(parse_millis(key, value)?)
            }
            "timing.buttons_hide_ms" => {
                self.timing_mut().buttons_hide_ms = Some(parse_millis(key, value)?)
            }
            "timing.buttons_leave_ms" => {
                self.timing_mut().buttons_leave_ms = Some(parse_millis(key, value)?)
            }
            "input.click_zone_width" => {
                self.input_mut().click_zone_width = Some(parse_pixels(key, value)?)
            }
            "input.edge_threshold" => {
                self.input_mut().edge_threshold = Some(parse_pixels(key, value)?)
            }
            "input.swipe_threshold" => {
                self.input_mut().swipe_threshold = Some(parse_pixels(key, value)?)
            }
            "input.stick_press" | "input.stick_release" => {
                let v = parse_deflection(key, value)?;
                let input = self.input_mut();
                let (press, release) = if key == "input.stick_press" {
                    (v, input.stick_release.unwrap_or(InputSettings::default().stick_release))
                } else {
                    (input.stick_press.unwrap_or(InputSettings::default().stick_press), v)
                };
                if release >= press {
                    anyhow::bail!(
                        "input.stick_release ({release}) must be below input.stick_press ({press})."
                    );
                }
                if key == "input.stick_press" {
                    input.stick_press = Some(v);
                } else {
                    input.stick_release = Some(v);
                }
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    fn timing_mut(&mut self) -> &mut TimingConfig {
        self.timing.get_or_insert_with(TimingConfig::default)
    }

    fn input_mut(&mut self) -> &mut InputConfig {
        self.input.get_or_insert_with(InputConfig::default)
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be a positive number of milliseconds."),
    }
}

fn parse_pixels(key: &str, value: &str) -> Result<f32> {
    match value.parse::<f32>() {
        Ok(px) if px.is_finite() && px >= 0.0 => Ok(px),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be a non-negative number of pixels."),
    }
}

fn parse_deflection(key: &str, value: &str) -> Result<f32> {
    match value.parse::<f32>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Ok(v),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be between 0.0 and 1.0."),
    }
}
