use std::fmt;

use serde::{Deserialize, Serialize};
use squzzle_core::grid::{
    GridLimits, GridPolicy, DEFAULT_MIN_PIECE_HEIGHT, DEFAULT_MIN_PIECE_WIDTH,
    DEFAULT_SNAP_THRESHOLD,
};
use squzzle_core::scatter::SCATTER_SEED;
use squzzle_core::viewport::{ZoomLimits, VIEW_ZOOM_MAX, VIEW_ZOOM_MIN, WHEEL_ZOOM_RATE};

/// Everything a session needs besides the image size. Any field missing
/// from a settings file keeps its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSettings {
    #[serde(default)]
    pub policy: GridPolicy,
    #[serde(default = "default_min_piece_width")]
    pub min_piece_width: f32,
    #[serde(default = "default_min_piece_height")]
    pub min_piece_height: f32,
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f32,
    #[serde(default = "default_zoom_min")]
    pub zoom_min: f32,
    #[serde(default = "default_zoom_max")]
    pub zoom_max: f32,
    #[serde(default = "default_wheel_zoom_rate")]
    pub wheel_zoom_rate: f32,
    #[serde(default = "default_seed")]
    pub seed: u32,
    #[serde(default)]
    pub wobble: bool,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            policy: GridPolicy::default(),
            min_piece_width: DEFAULT_MIN_PIECE_WIDTH,
            min_piece_height: DEFAULT_MIN_PIECE_HEIGHT,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            zoom_min: VIEW_ZOOM_MIN,
            zoom_max: VIEW_ZOOM_MAX,
            wheel_zoom_rate: WHEEL_ZOOM_RATE,
            seed: SCATTER_SEED,
            wobble: false,
        }
    }
}

fn default_min_piece_width() -> f32 {
    DEFAULT_MIN_PIECE_WIDTH
}

fn default_min_piece_height() -> f32 {
    DEFAULT_MIN_PIECE_HEIGHT
}

fn default_snap_threshold() -> f32 {
    DEFAULT_SNAP_THRESHOLD
}

fn default_zoom_min() -> f32 {
    VIEW_ZOOM_MIN
}

fn default_zoom_max() -> f32 {
    VIEW_ZOOM_MAX
}

fn default_wheel_zoom_rate() -> f32 {
    WHEEL_ZOOM_RATE
}

fn default_seed() -> u32 {
    SCATTER_SEED
}

impl PuzzleSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: PuzzleSettings =
            toml::from_str(text).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|err| SettingsError::Parse(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.policy {
            GridPolicy::FixedMultiplier { difficulty } => {
                if !difficulty.is_finite() || difficulty < 1.0 {
                    return Err(SettingsError::OutOfRange {
                        field: "difficulty",
                        value: difficulty,
                    });
                }
            }
            GridPolicy::AreaTarget { pieces } => {
                if pieces == 0 {
                    return Err(SettingsError::OutOfRange {
                        field: "pieces",
                        value: 0.0,
                    });
                }
            }
        }
        for (field, value) in [
            ("min_piece_width", self.min_piece_width),
            ("min_piece_height", self.min_piece_height),
            ("snap_threshold", self.snap_threshold),
            ("zoom_min", self.zoom_min),
            ("zoom_max", self.zoom_max),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::OutOfRange { field, value });
            }
        }
        if !self.wheel_zoom_rate.is_finite() {
            return Err(SettingsError::OutOfRange {
                field: "wheel_zoom_rate",
                value: self.wheel_zoom_rate,
            });
        }
        if self.zoom_min > self.zoom_max {
            return Err(SettingsError::ZoomBounds {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        Ok(())
    }

    pub fn grid_limits(&self) -> GridLimits {
        GridLimits {
            min_piece_width: self.min_piece_width,
            min_piece_height: self.min_piece_height,
            snap_threshold: self.snap_threshold,
        }
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.zoom_min,
            max: self.zoom_max,
            wheel_rate: self.wheel_zoom_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    Parse(String),
    OutOfRange { field: &'static str, value: f32 },
    ZoomBounds { min: f32, max: f32 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(message) => write!(f, "invalid settings: {message}"),
            SettingsError::OutOfRange { field, value } => {
                write!(f, "{field} out of range: {value}")
            }
            SettingsError::ZoomBounds { min, max } => {
                write!(f, "zoom_min {min} exceeds zoom_max {max}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = PuzzleSettings::from_toml_str("").unwrap();
        assert_eq!(settings, PuzzleSettings::default());
    }

    #[test]
    fn area_target_policy_parses() {
        let text = r#"
            snap_threshold = 12.5
            wobble = true

            [policy]
            kind = "area_target"
            pieces = 24
        "#;
        let settings = PuzzleSettings::from_toml_str(text).unwrap();
        assert_eq!(settings.policy, GridPolicy::AreaTarget { pieces: 24 });
        assert_eq!(settings.snap_threshold, 12.5);
        assert!(settings.wobble);
        assert_eq!(settings.min_piece_width, DEFAULT_MIN_PIECE_WIDTH);
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        let err = PuzzleSettings::from_toml_str("zoom_min = 5.0\nzoom_max = 2.0").unwrap_err();
        assert_eq!(err, SettingsError::ZoomBounds { min: 5.0, max: 2.0 });
    }

    #[test]
    fn zero_piece_target_is_rejected() {
        let settings = PuzzleSettings {
            policy: GridPolicy::AreaTarget { pieces: 0 },
            ..PuzzleSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::OutOfRange { field: "pieces", .. })
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let settings = PuzzleSettings {
            seed: 7,
            wobble: true,
            ..PuzzleSettings::default()
        };
        let text = settings.to_toml_string().unwrap();
        assert_eq!(PuzzleSettings::from_toml_str(&text).unwrap(), settings);
    }
}
