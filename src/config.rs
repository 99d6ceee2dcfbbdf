//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/default.toml` (version controlled)
//! 3. `config/user.toml` (gitignored, user overrides)
//! 4. Environment variables (`SHAPE_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub crates: CrateConfig,
    #[serde(default)]
    pub demo: DemoSelection,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from the `config` directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(config_dir.as_ref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes the platform and boxes cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("platform.width", self.platform.width),
            ("platform.height", self.platform.height),
            ("platform.min_size", self.platform.min_size),
            ("crates.size", self.crates.size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    fn figment(config_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for name in ["default.toml", "user.toml"] {
            let path = config_dir.join(name);
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // SHAPE_PLATFORM__MIN_SIZE=80 -> platform.min_size = 80
        figment.merge(Env::prefixed("SHAPE_").split("__"))
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Changing Shape".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Scene-wide physics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward gravity magnitude in scene units per second squared
    pub gravity: f32,
    /// Solver iterations per step
    pub iterations: usize,
    /// Physics steps per displayed frame
    pub substeps: u32,
    /// Displayed frames (ticks) per second
    pub tick_rate: u32,
    /// Typical object size in scene units
    pub length_unit: f32,
    /// Size of the walled screen box
    pub bounds: [f32; 2],
}

impl PhysicsConfig {
    /// Duration of one physics sub-step
    pub fn substep_dt(&self) -> f32 {
        1.0 / (self.tick_rate.max(1) as f32 * self.substeps.max(1) as f32)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 2000.0,
            iterations: 10,
            substeps: 3,
            tick_rate: 60,
            length_unit: 50.0,
            bounds: [640.0, 480.0],
        }
    }
}

/// The resizable platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub width: f32,
    pub height: f32,
    /// Smallest width and height the platform may shrink to
    pub min_size: f32,
    /// Size change per second at full keyboard deflection
    pub expand_rate: f32,
    pub mass: f32,
    pub friction: f32,
    pub position: [f32; 2],
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 50.0,
            min_size: 50.0,
            expand_rate: 100.0,
            mass: 10.0,
            friction: 0.9,
            position: [0.0, -200.0],
        }
    }
}

/// The boxes dropped onto the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrateConfig {
    pub count: usize,
    pub size: f32,
    pub mass: f32,
    pub friction: f32,
    /// Spawn position of the first box
    pub first: [f32; 2],
    /// Horizontal distance between spawned boxes
    pub spacing: f32,
}

impl Default for CrateConfig {
    fn default() -> Self {
        Self {
            count: 6,
            size: 50.0,
            mass: 1.0,
            friction: 0.9,
            first: [-150.0, 150.0],
            spacing: 60.0,
        }
    }
}

/// Which demo starts first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSelection {
    /// Demo key, e.g. `expand` or `stretch`
    pub start: String,
}

impl Default for DemoSelection {
    fn default() -> Self {
        Self {
            start: "expand".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Draw contact points
    pub show_contacts: bool,
    /// Ticks between platform size reports at debug level
    pub report_interval: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_contacts: true,
            report_interval: 60,
        }
    }
}

impl DebugConfig {
    /// Parse the configured level, falling back to `Info`
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[source] Box<figment::Error>),

    #[error("Configuration error: {field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.physics.gravity, 2000.0);
        assert_eq!(config.physics.substeps, 3);
        assert_eq!(config.platform.min_size, 50.0);
        assert_eq!(config.crates.count, 6);
        assert_eq!(config.demo.start, "expand");
    }

    #[test]
    fn test_substep_dt() {
        let physics = PhysicsConfig::default();
        assert!((physics.substep_dt() - 1.0 / 180.0).abs() < 1e-7);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("gravity"));
        assert!(toml.contains("expand_rate"));
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load_from("does-not-exist").expect("defaults load");
            assert_eq!(config.platform.width, 400.0);
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/default.toml",
                r#"
                [platform]
                width = 300.0

                [demo]
                start = "stretch"
                "#,
            )?;
            jail.create_file("config/user.toml", "[platform]\nmin_size = 20.0\n")?;
            jail.set_env("SHAPE_CRATES__COUNT", "3");

            let config = AppConfig::load_from("config").expect("layered config");
            assert_eq!(config.platform.width, 300.0);
            assert_eq!(config.platform.min_size, 20.0);
            assert_eq!(config.platform.height, 50.0);
            assert_eq!(config.crates.count, 3);
            assert_eq!(config.demo.start, "stretch");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/default.toml", "[physics]\nsubsteps = \"many\"\n")?;
            assert!(AppConfig::load_from("config").is_err());
            Ok(())
        });
    }

    #[test]
    fn test_non_positive_min_size_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("SHAPE_PLATFORM__MIN_SIZE", "0.0");
            let result = AppConfig::load_from("config");
            assert!(matches!(
                result,
                Err(ConfigError::NotPositive {
                    field: "platform.min_size",
                    ..
                })
            ));
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_degenerate_sizes() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.platform.height = -5.0;
        let err = config.validate().expect_err("negative height");
        assert_eq!(
            err.to_string(),
            "Configuration error: platform.height must be positive, got -5"
        );

        let mut config = AppConfig::default();
        config.crates.size = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_level_filter_fallback() {
        let mut debug = DebugConfig::default();
        debug.log_level = "debug".to_string();
        assert_eq!(debug.level_filter(), log::LevelFilter::Debug);
        debug.log_level = "chatty".to_string();
        assert_eq!(debug.level_filter(), log::LevelFilter::Info);
    }
}
