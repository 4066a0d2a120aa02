//! Configuration file support for the calorie tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/calorie/config.toml`.

use crate::{ActivityLevel, Error, Goal, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub targets: TargetConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Constants used to turn biometrics into a calorie target
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    #[serde(default)]
    pub multipliers: ActivityMultipliers,

    #[serde(default)]
    pub deficits: GoalDeficits,

    /// Lowest daily target ever recommended (kcal)
    #[serde(default = "default_min_calories")]
    pub min_calories: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            multipliers: ActivityMultipliers::default(),
            deficits: GoalDeficits::default(),
            min_calories: default_min_calories(),
        }
    }
}

/// BMR multiplier per activity tier
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityMultipliers {
    #[serde(default = "default_sedentary")]
    pub sedentary: f64,
    #[serde(default = "default_light")]
    pub light: f64,
    #[serde(default = "default_moderate")]
    pub moderate: f64,
    #[serde(default = "default_active")]
    pub active: f64,
    #[serde(default = "default_very_active")]
    pub very_active: f64,
}

impl Default for ActivityMultipliers {
    fn default() -> Self {
        Self {
            sedentary: default_sedentary(),
            light: default_light(),
            moderate: default_moderate(),
            active: default_active(),
            very_active: default_very_active(),
        }
    }
}

impl ActivityMultipliers {
    pub fn for_level(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }
}

/// Daily calorie deficit per goal (kcal, subtracted from TDEE)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalDeficits {
    #[serde(default)]
    pub maintain: f64,
    #[serde(default = "default_lose_mild")]
    pub lose_mild: f64,
    #[serde(default = "default_lose_normal")]
    pub lose_normal: f64,
    #[serde(default = "default_lose_extreme")]
    pub lose_extreme: f64,
}

impl Default for GoalDeficits {
    fn default() -> Self {
        Self {
            maintain: 0.0,
            lose_mild: default_lose_mild(),
            lose_normal: default_lose_normal(),
            lose_extreme: default_lose_extreme(),
        }
    }
}

impl GoalDeficits {
    pub fn for_goal(&self, goal: Goal) -> f64 {
        match goal {
            Goal::Maintain => self.maintain,
            Goal::LoseMild => self.lose_mild,
            Goal::LoseNormal => self.lose_normal,
            Goal::LoseExtreme => self.lose_extreme,
        }
    }
}

impl TargetConfig {
    /// Reject tables that would break target monotonicity
    pub fn validate(&self) -> Result<()> {
        let mut previous = 0.0;
        for level in ActivityLevel::ALL {
            let m = self.multipliers.for_level(level);
            if !m.is_finite() || m <= previous {
                return Err(Error::Config(format!(
                    "activity multiplier for {} must be greater than {}, got {}",
                    level, previous, m
                )));
            }
            previous = m;
        }

        let mut previous = 0.0;
        for goal in Goal::ALL {
            let d = self.deficits.for_goal(goal);
            if !d.is_finite() || d < previous {
                return Err(Error::Config(format!(
                    "deficit for {} must be at least {}, got {}",
                    goal, previous, d
                )));
            }
            previous = d;
        }

        if !self.min_calories.is_finite() || self.min_calories <= 0.0 {
            return Err(Error::Config(format!(
                "min_calories must be positive, got {}",
                self.min_calories
            )));
        }
        Ok(())
    }
}

/// Food image analyzer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analyzer program and arguments; image bytes are piped to its stdin
    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("calorie")
}

fn default_sedentary() -> f64 {
    1.2
}

fn default_light() -> f64 {
    1.375
}

fn default_moderate() -> f64 {
    1.55
}

fn default_active() -> f64 {
    1.725
}

fn default_very_active() -> f64 {
    1.9
}

fn default_lose_mild() -> f64 {
    250.0
}

fn default_lose_normal() -> f64 {
    500.0
}

fn default_lose_extreme() -> f64 {
    750.0
}

fn default_min_calories() -> f64 {
    1200.0
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.targets.validate()?;
        if self.analysis.timeout_secs == 0 {
            return Err(Error::Config("analysis timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("calorie").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
