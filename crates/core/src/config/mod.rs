use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{GeneratorError, Result};

/// Which alternate level is being generated. Each mode has its own
/// rotation limit and bottleneck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationMode {
    Degree360,
    Degree90,
}

impl RotationMode {
    /// Name the generated level is installed under.
    pub fn characteristic(self) -> &'static str {
        match self {
            RotationMode::Degree360 => "360Degree",
            RotationMode::Degree90 => "90Degree",
        }
    }
}

/// Dominant hand of the player, used by the single saber mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub levels: LevelConfig,
    pub generator: GenerationConfig,
}

impl AppConfig {
    /// Returns whether every setting that influences a level of `mode`
    /// still holds its default value.
    pub fn settings_are_default(&self, mode: RotationMode) -> bool {
        self.levels.based_on == LevelConfig::default().based_on
            && self.generator.is_default_for(mode)
    }
}

/// Which generated levels are offered and what they are based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub show_360_degree: bool,
    pub show_90_degree: bool,
    /// Characteristic used as the base for the generated levels.
    pub based_on: String,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            show_360_degree: true,
            show_90_degree: false,
            based_on: "Standard".to_string(),
        }
    }
}

impl LevelConfig {
    pub fn enabled_modes(&self) -> Vec<RotationMode> {
        let mut modes = Vec::new();
        if self.show_360_degree {
            modes.push(RotationMode::Degree360);
        }
        if self.show_90_degree {
            modes.push(RotationMode::Degree90);
        }
        modes
    }
}

/// Rotation limit and bottleneck for one mode, in rotation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationLimits {
    pub limit: i32,
    pub bottleneck: i32,
}

/// Tunable parameters of the generator. Times are in seconds, rotations in
/// 15 degree units (24 is one full turn).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub preferred_bar_duration: f32,
    pub limit_rotations_360: i32,
    pub bottleneck_rotations_360: i32,
    pub limit_rotations_90: i32,
    pub bottleneck_rotations_90: i32,
    pub enable_spin: bool,
    pub total_spin_time: f32,
    /// Minimum time between two spins.
    pub spin_cooldown: f32,
    /// Time cut off the front of a wall when rotating towards it.
    pub wall_front_cut: f32,
    /// Time cut off the back of a wall when rotating towards it.
    pub wall_back_cut: f32,
    pub min_wall_duration: f32,
    pub wall_generator: bool,
    /// Keep notes of one color only.
    pub only_one_saber: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            preferred_bar_duration: 1.84,
            limit_rotations_360: 28,
            bottleneck_rotations_360: 14,
            limit_rotations_90: 2,
            bottleneck_rotations_90: 1,
            enable_spin: false,
            total_spin_time: 0.6,
            spin_cooldown: 10.0,
            wall_front_cut: 0.2,
            wall_back_cut: 0.45,
            min_wall_duration: 0.1,
            wall_generator: false,
            only_one_saber: false,
        }
    }
}

impl GenerationConfig {
    pub fn limits(&self, mode: RotationMode) -> RotationLimits {
        match mode {
            RotationMode::Degree360 => RotationLimits {
                limit: self.limit_rotations_360,
                bottleneck: self.bottleneck_rotations_360,
            },
            RotationMode::Degree90 => RotationLimits {
                limit: self.limit_rotations_90,
                bottleneck: self.bottleneck_rotations_90,
            },
        }
    }

    /// Compares the parameters used by `mode` against their defaults. The
    /// other mode's limits are ignored.
    pub fn is_default_for(&self, mode: RotationMode) -> bool {
        let defaults = Self::default();
        self.limits(mode) == defaults.limits(mode)
            && self.preferred_bar_duration == defaults.preferred_bar_duration
            && self.enable_spin == defaults.enable_spin
            && self.total_spin_time == defaults.total_spin_time
            && self.spin_cooldown == defaults.spin_cooldown
            && self.wall_front_cut == defaults.wall_front_cut
            && self.wall_back_cut == defaults.wall_back_cut
            && self.min_wall_duration == defaults.min_wall_duration
            && self.wall_generator == defaults.wall_generator
            && self.only_one_saber == defaults.only_one_saber
    }

    /// Rejects values that would make generation loop forever or produce
    /// nonsensical geometry.
    pub fn validate(&self) -> Result<()> {
        if !self.preferred_bar_duration.is_finite() || self.preferred_bar_duration <= 0.0 {
            return Err(GeneratorError::config(format!(
                "preferred bar duration must be positive, got {}",
                self.preferred_bar_duration
            )));
        }

        let non_negative = [
            ("total spin time", self.total_spin_time),
            ("spin cooldown", self.spin_cooldown),
            ("wall front cut", self.wall_front_cut),
            ("wall back cut", self.wall_back_cut),
            ("min wall duration", self.min_wall_duration),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GeneratorError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Supplies the configuration snapshot used for one generation run.
pub trait ConfigSource {
    fn load_config(&self) -> Result<AppConfig>;
}

/// JSON configuration file. A missing file yields the defaults.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ConfigSource for JsonConfigFile {
    fn load_config(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::info!(path = ?self.path, "config file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let text = std::fs::read_to_string(&self.path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        config.generator.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_mode_limits() {
        let config = GenerationConfig::default();
        assert_eq!(
            config.limits(RotationMode::Degree360),
            RotationLimits {
                limit: 28,
                bottleneck: 14
            }
        );
        assert_eq!(
            config.limits(RotationMode::Degree90),
            RotationLimits {
                limit: 2,
                bottleneck: 1
            }
        );
    }

    #[test]
    fn settings_are_default_ignores_other_mode() {
        let mut config = AppConfig::default();
        config.generator.limit_rotations_90 = 5;

        assert!(config.settings_are_default(RotationMode::Degree360));
        assert!(!config.settings_are_default(RotationMode::Degree90));

        config.levels.based_on = "OneSaber".to_string();
        assert!(!config.settings_are_default(RotationMode::Degree360));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "generator": { "enable_spin": true } }"#).unwrap();

        assert!(config.generator.enable_spin);
        assert_eq!(config.generator.limit_rotations_360, 28);
        assert!(config.levels.show_360_degree);
    }

    #[test]
    fn rejects_non_positive_bar_duration() {
        let config = GenerationConfig {
            preferred_bar_duration: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("preferred bar duration"));
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let path = std::env::temp_dir().join("threesixty-missing-config-does-not-exist.json");
        let config = JsonConfigFile::new(path).load_config().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn enabled_modes_follow_level_flags() {
        let levels = LevelConfig {
            show_90_degree: true,
            ..Default::default()
        };
        assert_eq!(
            levels.enabled_modes(),
            vec![RotationMode::Degree360, RotationMode::Degree90]
        );
    }
}
