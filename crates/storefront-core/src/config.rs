//! Configuration loading and typed config structures for the Storefront
//! simulation.
//!
//! The canonical configuration lives in `storefront-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every section and every key is optional.

use std::path::Path;

use serde::Deserialize;
use storefront_agents::AgentConfig;
use storefront_types::Point;
use storefront_world::{DEFAULT_ITEMS_PER_SHELF, DEFAULT_ZONE_RADIUS, NavigationMode};

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "STOREFRONT_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Description of the offending value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `storefront-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Spawn budget, spawn timer and interaction cooldown.
    #[serde(default)]
    pub session: SessionConfig,

    /// NPC and follower tunables.
    #[serde(default)]
    pub agents: AgentConfig,

    /// Store stocking and navigation.
    #[serde(default)]
    pub store: StoreConfig,

    /// Automated player used by the headless engine.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `STOREFRONT_SEED`, when set, overrides `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.world.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.tick_duration_ms == 0 {
            return Err(invalid("world.tick_duration_ms must be at least 1"));
        }
        if self.session.spawn_interval_ms == 0 {
            return Err(invalid("session.spawn_interval_ms must be at least 1"));
        }
        if !self.store.zone_radius.is_finite() || self.store.zone_radius <= 0.0 {
            return Err(invalid("store.zone_radius must be positive"));
        }
        if !self.player.reach.is_finite() || self.player.reach < 0.0 {
            return Err(invalid("player.reach must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.player.notice_chance) {
            return Err(invalid("player.notice_chance must be within [0, 1]"));
        }
        self.agents
            .validate()
            .map_err(|err| ConfigError::Invalid {
                reason: err.to_string(),
            })
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable store name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Simulated milliseconds advanced by each tick.
    #[serde(default = "default_tick_duration_ms")]
    pub tick_duration_ms: u64,

    /// Real-time milliseconds the runner sleeps between ticks (0 = flat out).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl WorldConfig {
    /// Override the seed with `STOREFRONT_SEED` when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the variable is not a `u64`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var(SEED_ENV_VAR) {
            self.seed = val.trim().parse().map_err(|_err| ConfigError::Invalid {
                reason: format!("{SEED_ENV_VAR} must be an unsigned integer, got {val:?}"),
            })?;
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_duration_ms: default_tick_duration_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Customers spawned over the whole session.
    #[serde(default = "default_total_to_spawn")]
    pub total_to_spawn: u32,

    /// Delay from play start to the first spawn.
    #[serde(default = "default_spawn_initial_delay_ms")]
    pub spawn_initial_delay_ms: u64,

    /// Delay between subsequent spawns.
    #[serde(default = "default_spawn_interval_ms")]
    pub spawn_interval_ms: u64,

    /// Lockout after each accepted interaction.
    #[serde(default = "default_interaction_cooldown_ms")]
    pub interaction_cooldown_ms: u64,

    /// Whether every customer brings a child along.
    #[serde(default = "default_true")]
    pub spawn_followers: bool,

    /// How long the "Thief escaped!" popup is shown, in seconds.
    #[serde(default = "default_popup_seconds")]
    pub popup_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_to_spawn: default_total_to_spawn(),
            spawn_initial_delay_ms: default_spawn_initial_delay_ms(),
            spawn_interval_ms: default_spawn_interval_ms(),
            interaction_cooldown_ms: default_interaction_cooldown_ms(),
            spawn_followers: true,
            popup_seconds: default_popup_seconds(),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreConfig {
    /// Items stocked on each of the four shelves.
    #[serde(default = "default_items_per_shelf")]
    pub items_per_shelf: usize,

    /// Trigger radius around each waypoint.
    #[serde(default = "default_zone_radius")]
    pub zone_radius: f64,

    /// Headless navigator used for new entities.
    #[serde(default)]
    pub navigation: NavigationMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            items_per_shelf: default_items_per_shelf(),
            zone_radius: default_zone_radius(),
            navigation: NavigationMode::default(),
        }
    }
}

/// Automated player configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerConfig {
    /// Where the player stands.
    #[serde(default = "default_player_post")]
    pub post: Point,

    /// Interaction reach around the player.
    #[serde(default = "default_player_reach")]
    pub reach: f64,

    /// Per-tick probability of noticing an alerted thief within reach.
    #[serde(default = "default_notice_chance")]
    pub notice_chance: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            post: default_player_post(),
            reach: default_player_reach(),
            notice_chance: default_notice_chance(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Simulation boundary configuration.
///
/// A value of 0 for either field means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Maximum wall-clock seconds before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

fn default_world_name() -> String {
    "Corner Store".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_duration_ms() -> u64 {
    100
}

const fn default_tick_interval_ms() -> u64 {
    0
}

const fn default_total_to_spawn() -> u32 {
    5
}

const fn default_spawn_initial_delay_ms() -> u64 {
    10_000
}

const fn default_spawn_interval_ms() -> u64 {
    10_000
}

const fn default_interaction_cooldown_ms() -> u64 {
    1000
}

const fn default_popup_seconds() -> u64 {
    3
}

const fn default_items_per_shelf() -> usize {
    DEFAULT_ITEMS_PER_SHELF
}

const fn default_zone_radius() -> f64 {
    DEFAULT_ZONE_RADIUS
}

const fn default_player_post() -> Point {
    Point::new(1.0, -2.5)
}

const fn default_player_reach() -> f64 {
    5.0
}

const fn default_notice_chance() -> f64 {
    0.25
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
