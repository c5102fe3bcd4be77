//! Configuration errors.
//!
//! All errors produced by the config module (validation and env loading) use [`ConfigError`].

use thiserror::Error;

/// Errors produced when building or validating configuration.
///
/// # Variants
///
/// - **Validation**: A value is out of range (e.g. `iterations == 0`).
///   *When*: After building a `BenchConfig` and calling `validate()`.
///   *Recovery*: Fix the value so that `validate()` passes; the message names the rule.
///
/// - **EnvVar**: An environment variable could not be read (e.g. invalid Unicode).
///   *When*: When using env helpers to read a key.
///   *Recovery*: Ensure the variable contains valid Unicode.
///
/// - **Parse**: An environment variable was set but is not valid for its type (e.g. `MODE=fast`).
///   *When*: When using `env_parsed` on a set variable.
///   *Recovery*: Set a valid value or unset it to use the default; the error names the key and value.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration validation failed.
    #[error("config validation: {0}")]
    Validation(String),

    /// Failed to read an environment variable.
    #[error("env var {key}: {message}")]
    EnvVar {
        /// The full environment variable name that was read.
        key: String,
        /// Underlying cause (e.g. NotUnicode).
        message: String,
    },

    /// Environment variable was set but could not be parsed into the expected type.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        /// The full environment variable name.
        key: String,
        /// The raw value that failed to parse.
        value: String,
        /// Human-readable parse reason.
        message: String,
    },
}
