//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `SCALARGRAD_ITERATIONS`).
pub(crate) const ENV_PREFIX: &str = "SCALARGRAD_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_ITERATIONS: &str = "ITERATIONS";
pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_WORKLOAD: &str = "WORKLOAD";
pub(crate) const ENV_MODE: &str = "MODE";
pub(crate) const ENV_PRECISION: &str = "PRECISION";
pub(crate) const ENV_STATE_PATH: &str = "STATE_PATH";
pub(crate) const ENV_SAVE_STATE: &str = "SAVE_STATE";
pub(crate) const ENV_SAVE_GRADS: &str = "SAVE_GRADS";
pub(crate) const ENV_DOT_PATH: &str = "DOT_PATH";

// --- Default values ---

pub(crate) const DEFAULT_ITERATIONS: usize = 20_000;
pub(crate) const DEFAULT_SEED: u64 = 42;
pub(crate) const DEFAULT_STATE_PATH: &str = "scalargrad_state.bin";
pub(crate) const DEFAULT_SAVE_STATE: bool = false;
pub(crate) const DEFAULT_SAVE_GRADS: bool = false;
