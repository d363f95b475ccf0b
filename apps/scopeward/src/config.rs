use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use scopeward_auth::SecurityConfig;
use scopeward_scope::ScopeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable prefix; `__` separates nesting levels,
/// e.g. `SCOPEWARD__SECURITY__SECRET_KEY`.
pub const ENV_PREFIX: &str = "SCOPEWARD__";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub security: SecurityConfig,

    /// Known scope names mapped to a human-readable description
    pub scopes: BTreeMap<String, String>,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when neither `RUST_LOG` nor `-v` is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

impl AppConfig {
    /// Layered config: defaults -> YAML (if provided) -> env (`SCOPEWARD__*`)
    ///
    /// # Errors
    /// Fails if the file is missing or unreadable, or if a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| match path {
                Some(path) => format!("failed to load configuration from {}", path.display()),
                None => "failed to load configuration".to_owned(),
            })
    }

    /// Snapshot of the configured known scopes
    #[must_use]
    pub fn registry(&self) -> ScopeRegistry {
        self.scopes
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
            .collect()
    }

    /// Render as pretty JSON for `check`. The secret is always redacted.
    ///
    /// # Errors
    /// Fails only if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}
