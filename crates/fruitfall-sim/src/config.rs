use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gravity at level-speed 1.0 (units/frame^2, downward).
pub const BASE_GRAVITY: f32 = 0.46;
/// Horizontal walk speed at level-speed 1.0 (units/frame).
pub const BASE_MOVE_SPEED: f32 = 5.0;
/// Jump launch velocity at level-speed 1.0 (negative = upward).
pub const BASE_JUMP_POWER: f32 = -12.0;
/// Mid-air jump launch velocity at level-speed 1.0.
pub const BASE_DOUBLE_JUMP_POWER: f32 = -10.0;
/// A falling body snaps onto a surface if its previous bottom edge was at
/// most this far below the surface top.
pub const LANDING_TOLERANCE: f32 = 10.0;
pub const CANVAS_WIDTH: f32 = 1024.0;
pub const CANVAS_HEIGHT: f32 = 600.0;
/// Lives value that marks cheat mode. Never decremented.
pub const CHEAT_LIVES: u32 = 999;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Physics tunables before per-level speed scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_power: f32,
    pub double_jump_power: f32,
    pub landing_tolerance: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: BASE_GRAVITY,
            move_speed: BASE_MOVE_SPEED,
            jump_power: BASE_JUMP_POWER,
            double_jump_power: BASE_DOUBLE_JUMP_POWER,
            landing_tolerance: LANDING_TOLERANCE,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsConfig {
    /// Speed multiplier per level, index 0 = level 1. Levels past the end of
    /// the table reuse the last entry.
    pub speed_scale: Vec<f32>,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            speed_scale: vec![1.0, 1.1, 1.2, 1.3, 1.15],
        }
    }
}

/// Top-level simulation configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub levels: LevelsConfig,
    pub starting_lives: u32,
    /// Start with [`CHEAT_LIVES`] lives that never run out.
    pub cheat_lives: bool,
    pub seed: u64,
    pub start_level: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            levels: LevelsConfig::default(),
            starting_lives: 3,
            cheat_lives: false,
            seed: 42,
            start_level: 1,
        }
    }
}

impl SimConfig {
    /// Load config from `FRUITFALL_CONFIG` or `config/fruitfall.toml`.
    /// Falls back to defaults if the file is missing, unparseable or invalid.
    pub fn load() -> Self {
        let path = std::env::var("FRUITFALL_CONFIG")
            .unwrap_or_else(|_| "config/fruitfall.toml".to_string());
        let path = Path::new(&path);
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = toml::from_str::<SimConfig>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if !(p.gravity.is_finite() && p.gravity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.gravity must be positive, got {}",
                p.gravity
            )));
        }
        if !(p.move_speed.is_finite() && p.move_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.move_speed must be positive, got {}",
                p.move_speed
            )));
        }
        if !(p.jump_power.is_finite() && p.jump_power < 0.0)
            || !(p.double_jump_power.is_finite() && p.double_jump_power < 0.0)
        {
            return Err(ConfigError::Invalid(
                "jump powers must be negative (upward) launch velocities".to_string(),
            ));
        }
        if p.canvas_height <= crate::level::GROUND_HEIGHT || p.canvas_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "canvas {}x{} is too small",
                p.canvas_width, p.canvas_height
            )));
        }
        if self.levels.speed_scale.is_empty() {
            return Err(ConfigError::Invalid("levels.speed_scale is empty".to_string()));
        }
        if let Some(bad) = self
            .levels
            .speed_scale
            .iter()
            .find(|s| !(s.is_finite() && **s > 0.0))
        {
            return Err(ConfigError::Invalid(format!(
                "levels.speed_scale entries must be positive, got {bad}"
            )));
        }
        if !(1..=crate::level::FINAL_LEVEL).contains(&self.start_level) {
            return Err(ConfigError::Invalid(format!(
                "start_level must be within 1..={}, got {}",
                crate::level::FINAL_LEVEL,
                self.start_level
            )));
        }
        Ok(())
    }

    /// Speed multiplier for `level` (1-based).
    pub fn speed_scale(&self, level: u32) -> f32 {
        let idx = (level.max(1) - 1) as usize;
        self.levels
            .speed_scale
            .get(idx)
            .or(self.levels.speed_scale.last())
            .copied()
            .unwrap_or(1.0)
    }

    /// Physics values scaled for `level`.
    pub fn tuning(&self, level: u32) -> LevelTuning {
        let scale = self.speed_scale(level);
        let p = &self.physics;
        LevelTuning {
            scale,
            gravity: p.gravity * scale,
            move_speed: p.move_speed * scale,
            jump_power: p.jump_power * scale,
            double_jump_power: p.double_jump_power * scale,
            landing_tolerance: p.landing_tolerance,
            canvas_height: p.canvas_height,
            canvas_width: p.canvas_width,
        }
    }

    pub fn initial_lives(&self) -> u32 {
        if self.cheat_lives {
            CHEAT_LIVES
        } else {
            self.starting_lives
        }
    }
}

/// Per-level physics values, derived once at level load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTuning {
    pub scale: f32,
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_power: f32,
    pub double_jump_power: f32,
    pub landing_tolerance: f32,
    pub canvas_height: f32,
    pub canvas_width: f32,
}

impl LevelTuning {
    pub fn ground_y(&self) -> f32 {
        crate::level::LevelLayout::ground_y(self.canvas_height)
    }
}

impl Default for LevelTuning {
    fn default() -> Self {
        SimConfig::default().tuning(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn level_one_is_unscaled() {
        let t = SimConfig::default().tuning(1);
        assert_eq!(t.gravity, BASE_GRAVITY);
        assert_eq!(t.move_speed, BASE_MOVE_SPEED);
    }

    #[test]
    fn later_levels_are_faster() {
        let cfg = SimConfig::default();
        assert!(cfg.tuning(4).move_speed > cfg.tuning(1).move_speed);
    }

    #[test]
    fn missing_levels_reuse_last_scale() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.speed_scale(99), cfg.speed_scale(5));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: SimConfig = toml::from_str(
            r#"
            seed = 7
            [physics]
            gravity = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.physics.gravity, 0.5);
        assert_eq!(cfg.physics.move_speed, BASE_MOVE_SPEED);
        assert_eq!(cfg.starting_lives, 3);
    }

    #[test]
    fn validate_rejects_upward_gravity() {
        let mut cfg = SimConfig::default();
        cfg.physics.gravity = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_start_level() {
        let cfg = SimConfig {
            start_level: 9,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn try_load_reports_missing_file() {
        let err = SimConfig::try_load(Path::new("/nonexistent/fruitfall.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn cheat_mode_grants_cheat_lives() {
        let cfg = SimConfig {
            cheat_lives: true,
            ..Default::default()
        };
        assert_eq!(cfg.initial_lives(), CHEAT_LIVES);
    }
}
