use {
    crate::{Error, Result},
    serde::Deserialize,
    tracing_subscriber::EnvFilter,
};

///
/// The `[logging]` section: output format and the fallback filter used when
/// `RUST_LOG` is not set.
///
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `default` (full human-readable), `json`, `compact` or `pretty`.
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directives in `RUST_LOG` syntax, e.g. `"route_conf=debug"`.
    /// Resolution hits and misses are logged at `debug`, builds at `info`.
    #[serde(default = "LoggingConfig::default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: Self::default_filter(),
        }
    }
}

impl LoggingConfig {
    fn default_filter() -> String {
        "info".into()
    }

    /// `RUST_LOG` when set, the configured filter otherwise.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter).map_err(|err| {
                Error::config(format!("[logging] filter `{}` is invalid: {err}", self.filter))
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.filter).map_err(|err| {
            Error::config(format!("[logging] filter `{}` is invalid: {err}", self.filter))
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Default,
    Compact,
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let logging: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(logging.format, LogFormat::Default);
        assert_eq!(logging.filter, "info");
        assert!(logging.validate().is_ok());
    }

    #[test]
    fn test_invalid_filter() {
        let logging: LoggingConfig =
            toml::from_str(r#"filter = "route_conf=notalevel""#).unwrap();
        assert!(logging.validate().is_err());
    }
}
