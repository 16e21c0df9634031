//!
//! Configuration structures for the route engine.
//!
//! A configuration can be created in many ways:
//! - From an environment-specific TOML file via `Config::from_rust_env` or `Config::from_toml_file`
//! - From a TOML string via `Config::from_toml` or `str::parse`
//! - Constructed programmatically via the builder methods on `Config`
//!
//! In the TOML-based methods, environment variables can be referenced using
//! the {{ VAR_NAME }} syntax and are substituted before parsing.
//!
//! Configuration is split into logical sections:
//!
//! - `RoutingConfig` (`[routing]`) for route overrides and the default route
//! - `[handlers]` for a static handler registry (handler name -> actions)
//! - `LoggingConfig` (`[logging]`) for the tracing output format
//!
mod logging;
mod ordered;
mod routing;

pub use logging::*;
pub use ordered::*;
pub use routing::*;

use {
    crate::{Error, Result, utils::replace_handlebars_with_env},
    serde::Deserialize,
    std::{env, fs, str::FromStr},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Handler name -> exposed actions, in registration order.
    #[serde(default)]
    pub handlers: OrderedTable<Vec<String>>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    ///
    /// Loads `config/{RUST_ENV}.toml`, or falls back to an empty route table
    /// with the `Home`/`index` root route when `RUST_ENV` is unset or the
    /// file cannot be read or parsed.
    ///
    fn default() -> Self {
        match Self::from_rust_env() {
            Ok(config) => config,
            Err(_) => Config {
                routing: RoutingConfig::default(),
                handlers: OrderedTable::new(),
                logging: LoggingConfig::default(),
            },
        }
    }
}

impl Config {
    ///
    /// Loads `config/{RUST_ENV}.toml`. Fails when `RUST_ENV` is not set.
    ///
    pub fn from_rust_env() -> Result<Config> {
        Self::from_toml_file(env::var("RUST_ENV")?)
    }

    ///
    /// Given an environment name, loads "config/{env}.toml", substitutes any
    /// environment variables, and returns a Config struct.
    ///
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Config> {
        let path = format!("config/{}.toml", env.as_ref());
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    ///
    /// Parses a configuration string in TOML format into a Config struct.
    ///
    pub fn from_toml(toml_str: &str) -> Result<Config> {
        toml_str.parse()
    }

    /// Sets the handler and action of the fallback root route.
    pub fn with_default_route(mut self, handler: &str, action: &str) -> Self {
        self.routing.default_handler = handler.into();
        self.routing.default_action = action.into();
        self
    }

    /// Adds or replaces an explicit route override.
    pub fn with_route(mut self, pattern: &str, handler: &str, action: &str) -> Self {
        self.routing
            .routes
            .insert(pattern, RouteTarget::new(handler, action));
        self
    }

    /// Adds or replaces a handler of the static registry.
    pub fn with_handler<I, S>(mut self, handler: &str, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handlers
            .insert(handler, actions.into_iter().map(Into::into).collect());
        self
    }

    /// Adds an action name that must never become a route.
    pub fn with_reserved_action(mut self, action: &str) -> Self {
        self.routing.reserved_actions.push(action.into());
        self
    }

    /// Sets the log format of the LoggingConfig.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    /// Sets the filter used when `RUST_LOG` is not set.
    pub fn with_log_filter(mut self, filter: &str) -> Self {
        self.logging.filter = filter.into();
        self
    }

    /// Ensures that the configuration is valid.
    /// Override patterns must compile and every handler name must be non-empty,
    /// so that no configured route is silently dropped while building.
    pub fn validate(&self) -> Result<()> {
        self.routing.validate()?;
        for (handler, actions) in self.handlers.iter() {
            if handler.trim().is_empty() {
                return Err(Error::config("[handlers] contains an empty handler name."));
            }
            if actions.iter().any(|action| action.trim().is_empty()) {
                return Err(Error::config(format!(
                    "[handlers] {handler} lists an empty action name."
                )));
            }
        }
        self.logging.validate()?;
        Ok(())
    }

    ///
    /// Sets up the tracing subscriber for logging based on the LoggingConfig.
    ///
    /// NOTE: This should be called early during startup to ensure logging is configured
    ///       before any routes are built.
    ///
    pub fn setup_tracing(&self) {
        use tracing_subscriber::{EnvFilter, prelude::*};
        let env_filter = self
            .logging
            .env_filter()
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let format_layer = match self.logging.format {
            LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
            LogFormat::Default => tracing_subscriber::fmt::layer().boxed(),
            LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        };
        // A subscriber installed earlier (e.g. by tests) keeps precedence.
        let _ = tracing_subscriber::registry()
            .with(format_layer)
            .with(env_filter)
            .try_init();
    }
}

///
/// Parses a configuration string with references to environment variables
/// into a Config struct by substituting the environment variables and then
/// parsing the resulting TOML.
///
impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let config_file = replace_handlebars_with_env(s);
        let config = toml::from_str::<Config>(&config_file)?;
        Ok(config)
    }
}
