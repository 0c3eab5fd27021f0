//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_STREAMING__CLUSTER_NAME`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::route::Route;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        if let Some(file) = env_file(&env_name) {
            figment = figment.merge(Toml::file(file));
        }
        Ok(Self::from_figment(figment.merge(Env::prefixed("APP_").split("__"))))
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to read '{key}' from configuration: {e}"))
    }

    /// The `[streaming]` table, validated.
    pub fn searcher(&self) -> anyhow::Result<SearcherConfig> {
        let config: SearcherConfig = self.get("streaming")?;
        config.validate()?;
        Ok(config)
    }
}

/// Per-environment override file for `RUST_ENV`; unknown names get none.
fn env_file(env_name: &str) -> Option<&'static str> {
    match env_name {
        "dev" | "development" => Some("config.dev.toml"),
        "prod" | "production" => Some("config.prod.toml"),
        "test" | "testing" => Some("config.test.toml"),
        _ => None,
    }
}

/// Static settings of a streaming searcher, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearcherConfig {
    /// Display name of the content cluster; becomes the source of every hit.
    pub cluster_name: String,
    pub route: Route,
    pub document_type: String,
    #[serde(default = "default_summary_class")]
    pub default_summary_class: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
}

fn default_summary_class() -> Option<String> {
    Some("default".to_string())
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl SearcherConfig {
    pub fn new(cluster_name: impl Into<String>, route: Route, document_type: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            route,
            document_type: document_type.into(),
            default_summary_class: default_summary_class(),
            default_timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_default_summary_class(mut self, class: Option<String>) -> Self {
        self.default_summary_class = class;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cluster_name.trim().is_empty() {
            anyhow::bail!("streaming.cluster_name must not be empty");
        }
        if self.document_type.trim().is_empty() {
            anyhow::bail!("streaming.document_type must not be empty");
        }
        if self.default_timeout_ms == 0 {
            anyhow::bail!("streaming.default_timeout_ms must be positive");
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
