//! Engine configuration resource.
//!
//! Settings are read from an INI file. Missing files or keys keep their
//! defaults, so the engine always starts.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! fixed_dt = 0.016666
//! telemetry_interval_ms = 100
//!
//! [drive]
//! power = 5.0
//!
//! [combat]
//! player_attack_radius = 3.5
//! player_attack_damage = 10
//!
//! [ai]
//! enabled = true
//!
//! [recipes]
//! root = ./data
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;
const DEFAULT_TELEMETRY_INTERVAL_MS: u64 = 100;
const DEFAULT_DRIVE_POWER: f32 = 5.0;
const DEFAULT_ATTACK_RADIUS: f32 = 3.5;
const DEFAULT_ATTACK_DAMAGE: f32 = 10.0;
const DEFAULT_AI_ENABLED: bool = true;
const DEFAULT_DATA_ROOT: &str = "./data";
const DEFAULT_CONFIG_PATH: &str = "./verse.ini";

/// Recipe namespaces searched, in order, under the data root.
pub const RECIPE_NAMESPACES: [&str; 4] = ["monsters", "buildings", "recipes", "dashboard"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    Load(String),
    #[error("failed to save config file: {0}")]
    Save(String),
}

#[derive(Resource, Debug, Clone)]
pub struct EngineConfig {
    /// Frame delta used by the headless runner, in seconds.
    pub fixed_dt: f32,
    /// Period of the stats / race timer telemetry.
    pub telemetry_interval_ms: u64,
    /// Initial drive power.
    pub drive_power: f32,
    pub player_attack_radius: f32,
    pub player_attack_damage: f32,
    /// Whether mobs start awake.
    pub ai_enabled: bool,
    /// Root directory of recipe and dashboard data.
    pub data_root: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            telemetry_interval_ms: DEFAULT_TELEMETRY_INTERVAL_MS,
            drive_power: DEFAULT_DRIVE_POWER,
            player_attack_radius: DEFAULT_ATTACK_RADIUS,
            player_attack_damage: DEFAULT_ATTACK_DAMAGE,
            ai_enabled: DEFAULT_AI_ENABLED,
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from [`config_path`](Self::config_path).
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(ConfigError::Load)?;
        self.apply(&ini);
        info!(
            "Loaded config from {:?}: dt={}, power={}, ai={}, data={:?}",
            self.config_path, self.fixed_dt, self.drive_power, self.ai_enabled, self.data_root
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(ConfigError::Load)?;
        self.apply(&ini);
        Ok(())
    }

    fn apply(&mut self, ini: &Ini) {
        // [simulation] section
        if let Some(dt) = ini.getfloat("simulation", "fixed_dt").ok().flatten() {
            if dt > 0.0 {
                self.fixed_dt = dt as f32;
            }
        }
        if let Some(ms) = ini
            .getuint("simulation", "telemetry_interval_ms")
            .ok()
            .flatten()
        {
            self.telemetry_interval_ms = ms.max(1);
        }

        // [drive] section
        if let Some(power) = ini.getfloat("drive", "power").ok().flatten() {
            self.drive_power = power as f32;
        }

        // [combat] section
        if let Some(radius) = ini.getfloat("combat", "player_attack_radius").ok().flatten() {
            self.player_attack_radius = radius as f32;
        }
        if let Some(damage) = ini.getfloat("combat", "player_attack_damage").ok().flatten() {
            self.player_attack_damage = damage as f32;
        }

        // [ai] section
        if let Some(enabled) = ini.getbool("ai", "enabled").ok().flatten() {
            self.ai_enabled = enabled;
        }

        // [recipes] section
        if let Some(root) = ini.get("recipes", "root") {
            self.data_root = PathBuf::from(root);
        }
    }

    /// Save configuration to [`config_path`](Self::config_path).
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();

        ini.set("simulation", "fixed_dt", Some(self.fixed_dt.to_string()));
        ini.set(
            "simulation",
            "telemetry_interval_ms",
            Some(self.telemetry_interval_ms.to_string()),
        );
        ini.set("drive", "power", Some(self.drive_power.to_string()));
        ini.set(
            "combat",
            "player_attack_radius",
            Some(self.player_attack_radius.to_string()),
        );
        ini.set(
            "combat",
            "player_attack_damage",
            Some(self.player_attack_damage.to_string()),
        );
        ini.set("ai", "enabled", Some(self.ai_enabled.to_string()));
        ini.set(
            "recipes",
            "root",
            Some(self.data_root.display().to_string()),
        );

        ini.write(&self.config_path)
            .map_err(|e| ConfigError::Save(e.to_string()))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Directories searched for recipe files, in search order.
    pub fn recipe_dirs(&self) -> Vec<(&'static str, PathBuf)> {
        RECIPE_NAMESPACES
            .iter()
            .map(|ns| (*ns, self.data_root.join(ns)))
            .collect()
    }

    pub fn dashboard_data_dir(&self) -> PathBuf {
        dashboard_data_dir(&self.data_root)
    }
}

pub fn dashboard_data_dir(root: &Path) -> PathBuf {
    root.join("dashboard").join("business_data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_safe() {
        let cfg = EngineConfig::new();
        assert_eq!(cfg.drive_power, 5.0);
        assert_eq!(cfg.telemetry_interval_ms, 100);
        assert_eq!(cfg.player_attack_radius, 3.5);
        assert_eq!(cfg.player_attack_damage, 10.0);
        assert!(cfg.ai_enabled);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut cfg = EngineConfig::new();
        cfg.load_from_str("[drive]\npower = 8.5\n[ai]\nenabled = false\n")
            .unwrap();
        assert_eq!(cfg.drive_power, 8.5);
        assert!(!cfg.ai_enabled);
        assert_eq!(cfg.telemetry_interval_ms, 100);
    }

    #[test]
    fn recipe_dirs_follow_search_order() {
        let mut cfg = EngineConfig::new();
        cfg.load_from_str("[recipes]\nroot = /srv/verse\n").unwrap();
        let dirs: Vec<_> = cfg.recipe_dirs().into_iter().map(|(ns, _)| ns).collect();
        assert_eq!(dirs, ["monsters", "buildings", "recipes", "dashboard"]);
        assert_eq!(
            cfg.dashboard_data_dir(),
            PathBuf::from("/srv/verse/dashboard/business_data")
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut cfg = EngineConfig::with_path("/definitely/not/here.ini");
        assert!(matches!(cfg.load_from_file(), Err(ConfigError::Load(_))));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = std::env::temp_dir().join(format!("verse_cfg_{}.ini", std::process::id()));
        let mut cfg = EngineConfig::with_path(&path);
        cfg.drive_power = 7.0;
        cfg.ai_enabled = false;
        cfg.save_to_file().unwrap();

        let mut loaded = EngineConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.drive_power, 7.0);
        assert!(!loaded.ai_enabled);
        let _ = std::fs::remove_file(path);
    }
}
