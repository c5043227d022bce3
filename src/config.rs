//! Store configuration and construction options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// File used when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "store.json";

/// How load and save failures reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log failures and keep running against in-memory state.
    #[default]
    Lenient,
    /// Return failures to the caller.
    Strict,
}

/// Persistence settings for one store.
///
/// Derives [`clap::Args`] so a host CLI can `#[command(flatten)]` it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, clap::Args)]
#[serde(default)]
pub struct StoreConfig {
    /// File to store sent codes at program exit
    #[arg(long = "store_file", default_value = DEFAULT_STORE_FILE)]
    pub file: PathBuf,
    /// Whether load/save failures are logged or returned
    #[arg(long = "store_policy", value_enum, default_value_t = ErrorPolicy::Lenient)]
    pub policy: ErrorPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_STORE_FILE),
            policy: ErrorPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Config for `file` with the default policy.
    pub fn with_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> StoreResult<()> {
        if self.file.as_os_str().is_empty() {
            return Err(StoreError::Config("store file path is empty".to_string()));
        }
        Ok(())
    }
}

/// One construction option, applied in order by [`crate::Store::new`].
#[derive(Debug, Clone)]
pub enum StoreOption {
    /// Replace the whole config.
    Config(StoreConfig),
    /// Override the store file path.
    FilePath(PathBuf),
    /// Override the error policy.
    Policy(ErrorPolicy),
}

impl StoreOption {
    pub(crate) fn apply(self, config: &mut StoreConfig) -> StoreResult<()> {
        match self {
            StoreOption::Config(c) => {
                c.validate()?;
                *config = c;
            }
            StoreOption::FilePath(path) => {
                config.file = path;
                config.validate()?;
            }
            StoreOption::Policy(policy) => config.policy = policy,
        }
        Ok(())
    }
}

/// Applies `options` in order over the default config.
pub(crate) fn resolve(options: impl IntoIterator<Item = StoreOption>) -> StoreResult<StoreConfig> {
    let mut config = StoreConfig::default();
    for option in options {
        option.apply(&mut config)?;
    }
    Ok(config)
}
