//! # Platform Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//! Every knob has a sane default and an environment override.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MRV_STORAGE_ROOT` | `./mrv-data` | Root directory for local blobs |
//! | `MRV_SESSION_TTL_MS` | `28800000` (8h) | Session lifetime |
//! | `MRV_ALLOW_PARTIAL_RETIREMENT` | `true` | Token splitting on retire |
//! | `MRV_BUS_CAPACITY` | `1000` | Event bus channel capacity |
//! | `MRV_DEMO_SEED` | `true` | Seed demo organizations and accounts |
//! | `MRV_EPHEMERAL` | `false` | Keep blobs in memory (tests, CI) |

use std::path::PathBuf;

/// Complete platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Root directory for the local key-value store.
    pub storage_root: PathBuf,
    /// Session lifetime in milliseconds.
    pub session_ttl_ms: u64,
    /// Whether the ledger splits tokens on partial retirement.
    pub allow_partial_retirement: bool,
    /// Event bus channel capacity.
    pub bus_capacity: usize,
    /// Seed demo organizations, accounts, and projects at boot.
    pub demo_seed: bool,
    /// Use the in-memory store instead of files.
    pub ephemeral: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./mrv-data"),
            session_ttl_ms: 8 * 60 * 60 * 1000,
            allow_partial_retirement: true,
            bus_capacity: 1000,
            demo_seed: true,
            ephemeral: false,
        }
    }
}

impl PlatformConfig {
    /// Loads the configuration, applying environment overrides on top
    /// of the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var("MRV_STORAGE_ROOT") {
            config.storage_root = PathBuf::from(root);
        }
        if let Some(ttl) = env_parse("MRV_SESSION_TTL_MS") {
            config.session_ttl_ms = ttl;
        }
        if let Some(allow) = env_parse("MRV_ALLOW_PARTIAL_RETIREMENT") {
            config.allow_partial_retirement = allow;
        }
        if let Some(capacity) = env_parse("MRV_BUS_CAPACITY") {
            config.bus_capacity = capacity;
        }
        if let Some(seed) = env_parse("MRV_DEMO_SEED") {
            config.demo_seed = seed;
        }
        if let Some(ephemeral) = env_parse("MRV_EPHEMERAL") {
            config.ephemeral = ephemeral;
        }
        config
    }

    /// In-memory configuration for tests.
    pub fn ephemeral() -> Self {
        Self {
            ephemeral: true,
            demo_seed: false,
            ..Self::default()
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
