//! The flat settings record behind the form, its JSON persistence, and the
//! validation that turns it into a runnable [`ClickPlan`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClickerError, Result};
use crate::theme::Theme;

/// Unit the click-speed value is expressed in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    Seconds,
    Millis,
    Cps,
    Cpm,
}

impl SpeedUnit {
    pub const ALL: [SpeedUnit; 4] = [
        SpeedUnit::Seconds,
        SpeedUnit::Millis,
        SpeedUnit::Cps,
        SpeedUnit::Cpm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::Seconds => "seconds",
            SpeedUnit::Millis => "ms",
            SpeedUnit::Cps => "CPS",
            SpeedUnit::Cpm => "CPM",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickKind {
    Single,
    Double,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickButton {
    Left,
    Right,
}

/// Where the clicks land: wherever the pointer happens to be, or a picked
/// screen position the pointer is moved to first.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    Cursor,
    Fixed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    Forever,
    Count,
}

/// Everything the window edits, one field per widget. Persisted verbatim as
/// JSON so the file mirrors the form.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub speed_value: f64,
    pub speed_unit: SpeedUnit,
    pub randomize_interval: bool,
    pub random_min_secs: f64,
    pub random_max_secs: f64,
    pub pre_start_delay_secs: f64,
    pub click_kind: ClickKind,
    pub click_button: ClickButton,
    pub target: TargetMode,
    pub fixed_position: Option<(i32, i32)>,
    pub repeat: RepeatMode,
    pub repeat_count: u64,
    pub start_stop_key: String,
    pub pick_position_key: String,
    pub pause_resume_key: String,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_value: 1.0,
            speed_unit: SpeedUnit::Seconds,
            randomize_interval: false,
            random_min_secs: 0.1,
            random_max_secs: 0.5,
            pre_start_delay_secs: 0.0,
            click_kind: ClickKind::Single,
            click_button: ClickButton::Left,
            target: TargetMode::Cursor,
            fixed_position: None,
            repeat: RepeatMode::Forever,
            repeat_count: 100,
            start_stop_key: "F6".to_string(),
            pick_position_key: "F7".to_string(),
            pause_resume_key: "F8".to_string(),
            theme: Theme::Dark,
        }
    }
}

/// Validated runtime parameters handed to the click worker.
#[derive(Clone, PartialEq, Debug)]
pub struct ClickPlan {
    pub interval: Duration,
    pub random_range: Option<(Duration, Duration)>,
    pub pre_start_delay: Duration,
    pub kind: ClickKind,
    pub button: ClickButton,
    pub position: Option<(i32, i32)>,
    pub repeat_limit: Option<u64>,
}

impl Settings {
    /// The time between clicks implied by the speed value and unit.
    pub fn interval(&self) -> Result<Duration> {
        let value = self.speed_value;
        if !value.is_finite() || value <= 0.0 {
            return Err(ClickerError::invalid_setting(
                "click speed",
                "must be a positive number",
            ));
        }
        let secs = match self.speed_unit {
            SpeedUnit::Seconds => value,
            SpeedUnit::Millis => value / 1000.0,
            SpeedUnit::Cps => 1.0 / value,
            SpeedUnit::Cpm => 60.0 / value,
        };
        Ok(Duration::from_secs_f64(secs))
    }

    /// Validate the whole record and produce the plan the worker runs.
    pub fn click_plan(&self) -> Result<ClickPlan> {
        let interval = self.interval()?;

        if !self.pre_start_delay_secs.is_finite() || self.pre_start_delay_secs < 0.0 {
            return Err(ClickerError::invalid_setting(
                "pre-start delay",
                "cannot be negative",
            ));
        }

        let random_range = if self.randomize_interval {
            let (min, max) = (self.random_min_secs, self.random_max_secs);
            if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 || min > max {
                return Err(ClickerError::invalid_setting(
                    "random interval range",
                    format!("{min}..{max} is not a valid range"),
                ));
            }
            Some((Duration::from_secs_f64(min), Duration::from_secs_f64(max)))
        } else {
            None
        };

        let position = match self.target {
            TargetMode::Cursor => None,
            TargetMode::Fixed => Some(
                self.fixed_position
                    .ok_or(ClickerError::MissingFixedPosition)?,
            ),
        };

        let repeat_limit = match self.repeat {
            RepeatMode::Forever => None,
            RepeatMode::Count => {
                if self.repeat_count == 0 {
                    return Err(ClickerError::invalid_setting(
                        "repeat count",
                        "must be at least 1",
                    ));
                }
                Some(self.repeat_count)
            }
        };

        Ok(ClickPlan {
            interval,
            random_range,
            pre_start_delay: Duration::from_secs_f64(self.pre_start_delay_secs),
            kind: self.click_kind,
            button: self.click_button,
            position,
            repeat_limit,
        })
    }

    /// Read settings from `path`. A missing file is not an error; the caller
    /// gets the defaults and the first save creates the file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|err| ClickerError::SettingsLoad {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|err| ClickerError::SettingsLoad {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| ClickerError::SettingsSave {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                })?;
            }
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|err| ClickerError::SettingsSave {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Per-user settings location, next to other app configs.
    pub fn default_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("cadence-clicker").join("settings.json"),
            None => PathBuf::from("cadence-clicker-settings.json"),
        }
    }
}
