//! Configuration for the benchmark harness.
//!
//! Load from environment via [`from_env`] and validate with [`BenchConfig::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use constants::{
    DEFAULT_ITERATIONS, DEFAULT_SAVE_GRADS, DEFAULT_SAVE_STATE, DEFAULT_SEED, DEFAULT_STATE_PATH,
};

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::ConfigError;

use crate::state::StateLayout;
use crate::workload::Workload;

/// How each iteration obtains its graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Build a fresh graph every iteration; the previous one is dropped.
    #[default]
    Rebuild,
    /// Build once, then refresh leaves, recompute and re-sweep in place.
    Reuse,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Rebuild => f.write_str("rebuild"),
            Mode::Reuse => f.write_str("reuse"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rebuild" => Ok(Mode::Rebuild),
            "reuse" => Ok(Mode::Reuse),
            other => Err(format!("unknown mode {other:?} (expected rebuild or reuse)")),
        }
    }
}

/// Element type the harness runs with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    #[default]
    F64,
    F32,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::F64 => f.write_str("f64"),
            Precision::F32 => f.write_str("f32"),
        }
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f64" | "double" => Ok(Precision::F64),
            "f32" | "float" => Ok(Precision::F32),
            other => Err(format!("unknown precision {other:?} (expected f64 or f32)")),
        }
    }
}

/// Benchmark harness configuration.
///
/// Use [`from_env`] to build from environment variables and [`BenchConfig::validate`] before use.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    /// Number of build/sweep rounds.
    pub iterations: usize,
    /// Seed for the leaf refresh RNG in reuse mode.
    pub seed: u64,
    pub workload: Workload,
    pub mode: Mode,
    pub precision: Precision,
    /// Where the state tuple is written when `save_state` is set.
    pub state_path: PathBuf,
    /// Write the state tuple every iteration.
    pub save_state: bool,
    /// Append the grads block to each dump.
    pub save_grads: bool,
    /// Write the final graph as GraphViz DOT here, if set.
    pub dot_path: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
            workload: Workload::default(),
            mode: Mode::default(),
            precision: Precision::default(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            save_state: DEFAULT_SAVE_STATE,
            save_grads: DEFAULT_SAVE_GRADS,
            dot_path: None,
        }
    }
}

impl BenchConfig {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::Validation(
                "iterations must be greater than 0".to_string(),
            ));
        }
        if self.save_grads && !self.save_state {
            return Err(ConfigError::Validation(
                "save_grads requires save_state".to_string(),
            ));
        }
        if self.save_state && self.state_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "state_path must not be empty when save_state is set".to_string(),
            ));
        }
        Ok(())
    }

    /// Blocks written per dump.
    #[must_use]
    pub fn state_layout(&self) -> StateLayout {
        StateLayout {
            values: true,
            grads: self.save_grads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::constants::{
        ENV_DOT_PATH, ENV_ITERATIONS, ENV_MODE, ENV_PRECISION, ENV_SAVE_GRADS, ENV_SAVE_STATE,
        ENV_SEED, ENV_WORKLOAD,
    };
    use super::*;

    /// Lock so env tests don't run in parallel and pollute each other.
    static CONFIG_ENV_LOCK: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = BenchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.iterations, 20_000);
        assert_eq!(cfg.workload, Workload::Small);
        assert_eq!(cfg.mode, Mode::Rebuild);
        assert_eq!(cfg.precision, Precision::F64);
        assert_eq!(cfg.state_layout(), StateLayout::VALUES);
    }

    #[test]
    fn validate_rejects_zero_iterations() {
        let cfg = BenchConfig {
            iterations: 0,
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_grads_without_state() {
        let cfg = BenchConfig {
            save_grads: true,
            ..BenchConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = BenchConfig {
            save_state: true,
            save_grads: true,
            ..BenchConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.state_layout(), StateLayout::VALUES_AND_GRADS);
    }

    #[test]
    fn mode_and_precision_parse() {
        assert_eq!("reuse".parse::<Mode>().unwrap(), Mode::Reuse);
        assert_eq!("REBUILD".parse::<Mode>().unwrap(), Mode::Rebuild);
        assert!("fast".parse::<Mode>().is_err());
        assert_eq!("f32".parse::<Precision>().unwrap(), Precision::F32);
        assert_eq!("double".parse::<Precision>().unwrap(), Precision::F64);
        assert!("f16".parse::<Precision>().is_err());
        assert_eq!(Mode::Reuse.to_string(), "reuse");
        assert_eq!(Precision::F32.to_string(), "f32");
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let _g = env_lock();
        for suffix in [
            ENV_ITERATIONS, ENV_SEED, ENV_WORKLOAD, ENV_MODE, ENV_PRECISION, ENV_SAVE_STATE,
            ENV_SAVE_GRADS, ENV_DOT_PATH,
        ] {
            std::env::remove_var(env_key(suffix));
        }
        let cfg = from_env().unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.iterations, BenchConfig::default().iterations);
        assert_eq!(cfg.dot_path, None);
    }

    #[test]
    fn from_env_overrides_with_env_vars() {
        let _g = env_lock();
        let keys = [
            (env_key(ENV_ITERATIONS), "5"),
            (env_key(ENV_WORKLOAD), "tiny"),
            (env_key(ENV_MODE), "reuse"),
            (env_key(ENV_PRECISION), "f32"),
            (env_key(ENV_DOT_PATH), "graph.dot"),
        ];
        for (k, v) in &keys {
            std::env::set_var(k, v);
        }
        let cfg = from_env();
        for (k, _) in &keys {
            std::env::remove_var(k);
        }
        let cfg = cfg.unwrap();
        assert_eq!(cfg.iterations, 5);
        assert_eq!(cfg.workload, Workload::Tiny);
        assert_eq!(cfg.mode, Mode::Reuse);
        assert_eq!(cfg.precision, Precision::F32);
        assert_eq!(cfg.dot_path, Some(PathBuf::from("graph.dot")));
    }

    #[test]
    fn from_env_returns_error_on_invalid_parse() {
        let _g = env_lock();
        let key = env_key(ENV_MODE);
        std::env::set_var(&key, "fast");
        let res = from_env();
        std::env::remove_var(key);
        assert!(matches!(res, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn validation_error_names_the_rule() {
        let cfg = BenchConfig {
            iterations: 0,
            ..BenchConfig::default()
        };
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.starts_with("config validation"));
        assert!(msg.contains("iterations"));
    }

    #[test]
    fn unknown_precision_reports_key_and_value() {
        let _g = env_lock();
        let key = env_key(ENV_PRECISION);
        std::env::set_var(&key, "f16");
        let res = from_env();
        std::env::remove_var(&key);
        let msg = res.unwrap_err().to_string();
        assert!(msg.contains("SCALARGRAD_PRECISION"));
        assert!(msg.contains("\"f16\""));
        assert!(msg.contains("expected f64 or f32"));
    }

    #[test]
    fn save_flags_parse_as_bools() {
        let _g = env_lock();
        let state = env_key(ENV_SAVE_STATE);
        let grads = env_key(ENV_SAVE_GRADS);
        std::env::set_var(&state, "true");
        std::env::set_var(&grads, "true");
        let cfg = from_env();
        std::env::set_var(&grads, "yes");
        let bad = env_parsed::<bool>(&grads);
        std::env::remove_var(&state);
        std::env::remove_var(&grads);
        let cfg = cfg.unwrap();
        assert!(cfg.save_state && cfg.save_grads);
        assert_eq!(cfg.state_layout(), StateLayout::VALUES_AND_GRADS);
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn env_parsed_invalid_returns_parse_error() {
        let _g = env_lock();
        let key = env_key(ENV_ITERATIONS);
        std::env::set_var(&key, "not_usize");
        let res = env_parsed::<usize>(&key);
        std::env::remove_var(key);
        assert!(matches!(res, Err(ConfigError::Parse { .. })));
    }
}
