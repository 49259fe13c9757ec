use std::path::PathBuf;

use log::warn;

use crate::error::{Error, Result};

pub const ENV_STRATEGY: &str = "VISIT_COUNTER_STRATEGY";
pub const ENV_PATH: &str = "VISIT_COUNTER_PATH";
pub const ENV_SEED: &str = "VISIT_COUNTER_SEED";
pub const ENV_ENVIRONMENT: &str = "VISIT_COUNTER_ENV";
pub const ENV_APP_ENVIRONMENT: &str = "APP_ENV";

pub const DEFAULT_COUNT_FILE: &str = "visitor-count.txt";

/// Which backing store holds the count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Process lifetime, lost on restart.
    #[default]
    Memory,
    /// One decimal integer in a flat text file.
    File,
}

/// How the in-memory count picks its starting value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Seed {
    /// Uniform in `[150, 450)`.
    #[default]
    Random,
    /// Deterministic per UTC calendar day, in `[150, 350)`.
    Daily,
    /// Exactly this value.
    Fixed(u64),
}

/// Build/runtime environment. Only affects how a result is rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Options to configure a visit counter.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct Options {
    /// The backing store.
    ///
    /// Default: Memory
    pub strategy: Strategy,

    /// Location of the count file, relative to the working directory unless
    /// absolute. Ignored by the memory strategy.
    ///
    /// Default: `visitor-count.txt`
    pub path: PathBuf,

    /// Starting value policy for the memory strategy. The file strategy
    /// always starts from an absent file, i.e. zero.
    ///
    /// Default: Random
    pub seed: Seed,

    /// Whether rendered labels carry the source tag.
    ///
    /// Default: Production
    pub environment: Environment,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strategy: Strategy::Memory,
            path: PathBuf::from(DEFAULT_COUNT_FILE),
            seed: Seed::Random,
            environment: Environment::Production,
        }
    }
}

impl Options {
    pub fn memory(seed: Seed) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            strategy: Strategy::File,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Reads options from the process environment, keeping defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Options::from_env`], with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(value) = lookup(ENV_STRATEGY) {
            options.strategy = match value.trim().to_ascii_lowercase().as_str() {
                "memory" => Strategy::Memory,
                "file" => Strategy::File,
                _ => return Err(invalid(ENV_STRATEGY, value)),
            };
        }

        if let Some(value) = lookup(ENV_PATH) {
            if value.trim().is_empty() {
                return Err(invalid(ENV_PATH, value));
            }
            options.path = PathBuf::from(value);
        }

        if let Some(value) = lookup(ENV_SEED) {
            options.seed = match value.trim().to_ascii_lowercase().as_str() {
                "random" => Seed::Random,
                "daily" => Seed::Daily,
                n => match n.parse::<u64>() {
                    Ok(n) => Seed::Fixed(n),
                    Err(_) => return Err(invalid(ENV_SEED, value)),
                },
            };
        }

        // Our own variable must be valid. The shared `APP_ENV` may hold
        // values meant for other tools, anything unknown there is production.
        if let Some(value) = lookup(ENV_ENVIRONMENT) {
            options.environment = match parse_environment(&value) {
                Some(env) => env,
                None => return Err(invalid(ENV_ENVIRONMENT, value)),
            };
        } else if let Some(value) = lookup(ENV_APP_ENVIRONMENT) {
            options.environment = parse_environment(&value).unwrap_or_else(|| {
                warn!("Unknown {ENV_APP_ENVIRONMENT}={value:?}, assuming production");
                Environment::Production
            });
        }

        Ok(options)
    }
}

fn parse_environment(value: &str) -> Option<Environment> {
    match value.trim().to_ascii_lowercase().as_str() {
        "development" | "dev" => Some(Environment::Development),
        "production" | "prod" => Some(Environment::Production),
        _ => None,
    }
}

fn invalid(key: &'static str, value: String) -> Error {
    Error::InvalidOption { key, value }
}
