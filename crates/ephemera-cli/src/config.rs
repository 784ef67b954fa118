//! Configuration file and environment overrides

use ephemera_context::{load_toml, ClientConfig, ConfigError};
use ephemera_forge::ForgeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the CLI needs to talk to the service
///
/// ```toml
/// [client]
/// base_url = "https://api.sruim.xin"
/// request_timeout_ms = 10000
///
/// [forge]
/// poll_interval_ms = 3000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EphemeraConfig {
    pub(crate) client: ClientConfig,
    pub(crate) forge: ForgeConfig,
}

impl EphemeraConfig {
    /// Defaults or `path`, then `EPHEMERA_*` variables, then validation
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: Self = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                load_toml(path)?
            }
            None => Self::default(),
        };
        let config = Self {
            client: file.client.apply_overrides(lookup)?,
            forge: file.forge,
        };
        config.client.validate()?;
        config.forge.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::time::Duration;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_file() {
        let config = EphemeraConfig::load_with(None, no_env).unwrap();
        assert_eq!(config, EphemeraConfig::default());
        assert_eq!(config.forge.poll_interval, Duration::from_secs(3));
    }

    #[test]
    fn file_values_then_env_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[client]\nbase_url = \"https://staging.example.test\"\nrequest_timeout_ms = 2500\n\n[forge]\nmax_poll_duration_ms = 60000"
        )
        .unwrap();

        let config = EphemeraConfig::load_with(Some(file.path()), |key| {
            (key == "EPHEMERA_APP_ID").then(|| "from-env".to_string())
        })
        .unwrap();

        assert_eq!(config.client.base_url, "https://staging.example.test");
        assert_eq!(config.client.app_id, "from-env");
        assert_eq!(config.client.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.forge.max_poll_duration, Duration::from_secs(60));
        assert_eq!(config.forge.poll_interval, Duration::from_secs(3));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[forge]\npoll_interval_ms = 0").unwrap();
        assert!(matches!(
            EphemeraConfig::load_with(Some(file.path()), no_env),
            Err(ConfigError::Invalid(_))
        ));

        let bad_env = EphemeraConfig::load_with(None, |key| {
            (key == "EPHEMERA_API_BASE").then(|| "not a url".to_string())
        });
        assert!(bad_env.is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EphemeraConfig::load_with(Some(&dir.path().join("absent.toml")), no_env);
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }
}
