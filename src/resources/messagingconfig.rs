//! Messaging configuration resource.
//!
//! Settings for the dispatcher, the object pool and the unique ID generator,
//! loaded from an INI configuration file. Every value has a safe default, so a
//! missing file or key is never fatal.
//!
//! # Configuration File Format
//!
//! ```ini
//! [dispatch]
//! cache = true
//! max_depth = 256
//! duplicates = replace
//!
//! [pool]
//! enabled = true
//!
//! [ids]
//! seed = 42
//! ```
//!
//! `duplicates` is either `replace` (last registration wins) or `reject`.
//! `seed` is optional; without it unique IDs are seeded from the OS.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default safe values for startup
const DEFAULT_CACHE_ENABLED: bool = true;
const DEFAULT_MAX_DEPTH: usize = 256;
const DEFAULT_POOL_ENABLED: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// What to do when a handler is registered twice under the same name and
/// signature on the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The new handler replaces the old one, which is unregistered.
    #[default]
    Replace,
    /// The registration fails and the existing handler stays.
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(DuplicatePolicy::Replace),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(ConfigError::Invalid {
                key: "dispatch.duplicates".into(),
                value: other.into(),
            }),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Replace => write!(f, "replace"),
            DuplicatePolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Messaging configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct MessagingConfig {
    /// Memoize resolved (sender, message) -> owner lookups.
    pub cache_enabled: bool,
    /// Maximum number of parent links followed by one dispatch.
    pub max_depth: usize,
    /// Policy for duplicate handler registrations.
    pub duplicates: DuplicatePolicy,
    /// Route instantiate/destroy through the object pool.
    pub pool_enabled: bool,
    /// Seed for the unique ID generator.
    pub id_seed: Option<u64>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagingConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            cache_enabled: DEFAULT_CACHE_ENABLED,
            max_depth: DEFAULT_MAX_DEPTH,
            duplicates: DuplicatePolicy::default(),
            pool_enabled: DEFAULT_POOL_ENABLED,
            id_seed: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or a value is malformed.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(ConfigError::Load)?;
        self.apply(&config)?;

        info!(
            "Loaded messaging config: cache={}, max_depth={}, duplicates={}, pool={}, seed={:?}",
            self.cache_enabled, self.max_depth, self.duplicates, self.pool_enabled, self.id_seed
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(ConfigError::Load)?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), ConfigError> {
        // [dispatch] section
        if let Some(cache) = read_bool(config, "dispatch", "cache")? {
            self.cache_enabled = cache;
        }
        if let Some(depth) = read_uint(config, "dispatch", "max_depth")? {
            self.max_depth = depth as usize;
        }
        if let Some(policy) = config.get("dispatch", "duplicates") {
            self.duplicates = policy.parse()?;
        }

        // [pool] section
        if let Some(enabled) = read_bool(config, "pool", "enabled")? {
            self.pool_enabled = enabled;
        }

        // [ids] section
        if let Some(seed) = read_uint(config, "ids", "seed")? {
            self.id_seed = Some(seed);
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        config.set("dispatch", "cache", Some(self.cache_enabled.to_string()));
        config.set("dispatch", "max_depth", Some(self.max_depth.to_string()));
        config.set("dispatch", "duplicates", Some(self.duplicates.to_string()));
        config.set("pool", "enabled", Some(self.pool_enabled.to_string()));
        if let Some(seed) = self.id_seed {
            config.set("ids", "seed", Some(seed.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| ConfigError::Save(e.to_string()))?;

        info!("Saved messaging config to {:?}", self.config_path);

        Ok(())
    }
}

fn read_bool(config: &Ini, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
    config
        .getbool(section, key)
        .map_err(|_| invalid(config, section, key))
}

fn read_uint(config: &Ini, section: &str, key: &str) -> Result<Option<u64>, ConfigError> {
    config
        .getuint(section, key)
        .map_err(|_| invalid(config, section, key))
}

fn invalid(config: &Ini, section: &str, key: &str) -> ConfigError {
    ConfigError::Invalid {
        key: format!("{section}.{key}"),
        value: config.get(section, key).unwrap_or_default(),
    }
}
