//! Build [`BenchConfig`] from environment variables.
//!
//! Uses [`env_string`] and [`env_parsed`] to read env vars with a single place for key names
//! (the `constants` submodule) and typed errors ([`ConfigError`]).

use std::path::PathBuf;

use super::constants::{
    ENV_DOT_PATH, ENV_ITERATIONS, ENV_MODE, ENV_PRECISION, ENV_PREFIX, ENV_SAVE_GRADS,
    ENV_SAVE_STATE, ENV_SEED, ENV_STATE_PATH, ENV_WORKLOAD,
};
use super::{BenchConfig, ConfigError, Mode, Precision};
use crate::workload::Workload;

/// Returns the full environment variable key for a given suffix (e.g. `SEED` → `SCALARGRAD_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string.
///
/// Returns `Some(value)` if the variable is set and valid UTF-8, `None` if unset.
/// Returns `Err(ConfigError::EnvVar)` if the variable is set but not Unicode.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into type `T`.
///
/// Returns `Ok(Some(value))` if set and parse succeeds, `Ok(None)` if unset, and
/// `Err(ConfigError::Parse)` if set but parsing fails (e.g. `ITERATIONS=abc`).
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    match s.trim().parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Builds [`BenchConfig`] from environment variables, falling back to [`BenchConfig::default`]
/// for unset values.
///
/// Returns [`ConfigError`] if any *set* variable fails to parse (e.g. `SCALARGRAD_MODE=fast`).
pub fn from_env() -> Result<BenchConfig, ConfigError> {
    let default = BenchConfig::default();

    let iterations = env_parsed::<usize>(&env_key(ENV_ITERATIONS))?.unwrap_or(default.iterations);
    let seed = env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed);
    let workload = env_parsed::<Workload>(&env_key(ENV_WORKLOAD))?.unwrap_or(default.workload);
    let mode = env_parsed::<Mode>(&env_key(ENV_MODE))?.unwrap_or(default.mode);
    let precision = env_parsed::<Precision>(&env_key(ENV_PRECISION))?.unwrap_or(default.precision);
    let state_path = env_string(&env_key(ENV_STATE_PATH))?
        .map(PathBuf::from)
        .unwrap_or_else(|| default.state_path.clone());
    let save_state = env_parsed::<bool>(&env_key(ENV_SAVE_STATE))?.unwrap_or(default.save_state);
    let save_grads = env_parsed::<bool>(&env_key(ENV_SAVE_GRADS))?.unwrap_or(default.save_grads);
    let dot_path = env_string(&env_key(ENV_DOT_PATH))?
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    Ok(BenchConfig {
        iterations,
        seed,
        workload,
        mode,
        precision,
        state_path,
        save_state,
        save_grads,
        dot_path,
    })
}
