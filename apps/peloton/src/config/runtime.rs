//! Runtime configuration read from `PELOTON_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

const DEFAULT_JOIN_CODE_ATTEMPTS: u32 = 5;
const DEFAULT_SIM_ROUNDS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Fixed shuffle seed; `None` seeds from the OS.
    pub shuffle_seed: Option<u64>,
    /// Join-code generation attempts before giving up on collisions.
    pub join_code_attempts: u32,
    /// Rounds the simulation binary plays.
    pub sim_rounds: u32,
    /// Where resume identifiers are persisted; `None` keeps them in memory.
    pub identity_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            shuffle_seed: None,
            join_code_attempts: DEFAULT_JOIN_CODE_ATTEMPTS,
            sim_rounds: DEFAULT_SIM_ROUNDS,
            identity_file: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let join_code_attempts =
            parsed_var("PELOTON_JOIN_CODE_ATTEMPTS")?.unwrap_or(DEFAULT_JOIN_CODE_ATTEMPTS);
        if join_code_attempts == 0 {
            return Err(AppError::config(
                "PELOTON_JOIN_CODE_ATTEMPTS must be at least 1",
            ));
        }

        Ok(Self {
            shuffle_seed: parsed_var("PELOTON_SHUFFLE_SEED")?,
            join_code_attempts,
            sim_rounds: parsed_var("PELOTON_SIM_ROUNDS")?.unwrap_or(DEFAULT_SIM_ROUNDS),
            identity_file: opt_var("PELOTON_IDENTITY_FILE").map(PathBuf::from),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}

/// Non-empty, trimmed value of an optional variable.
fn opt_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    opt_var(name)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| {
                AppError::config(format!(
                    "Environment variable '{name}' has invalid value '{raw}'"
                ))
            })
        })
        .transpose()
}
