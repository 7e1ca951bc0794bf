use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PROJECT_ID: &str = "BASIC_PROJECT_ID";
const ENV_TOKEN: &str = "BASIC_JWT";

/// Which endpoint synthesizes items when the store runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Baas,
    Local,
}

impl GeneratorKind {
    pub fn label(self) -> &'static str {
        match self {
            GeneratorKind::Baas => "BAAS",
            GeneratorKind::Local => "LOCAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaasConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub token: String,
}

impl Default for BaasConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project_id: String::new(),
            token: String::new(),
        }
    }
}

impl BaasConfig {
    /// `{base_url}/account/{project_id}/db`, or `None` without a project id.
    pub fn db_url(&self) -> Option<String> {
        if self.project_id.trim().is_empty() {
            return None;
        }
        Some(format!(
            "{}/account/{}/db",
            self.base_url.trim_end_matches('/'),
            self.project_id.trim()
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_initial_count")]
    pub initial_count: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_load_threshold")]
    pub load_threshold: f64,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_generator")]
    pub generator: GeneratorKind,
    #[serde(default = "default_local_url")]
    pub local_url: String,
    #[serde(default)]
    pub baas: BaasConfig,
}

fn default_base_url() -> String {
    "https://api.basic.tech".to_string()
}

fn default_initial_count() -> usize {
    5
}

fn default_page_size() -> usize {
    5
}

fn default_load_threshold() -> f64 {
    1.2
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_generator() -> GeneratorKind {
    GeneratorKind::Baas
}

fn default_local_url() -> String {
    "http://localhost:5000/generate".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_count: default_initial_count(),
            page_size: default_page_size(),
            load_threshold: default_load_threshold(),
            request_timeout_secs: default_timeout_secs(),
            generator: default_generator(),
            local_url: default_local_url(),
            baas: BaasConfig::default(),
        }
    }
}

impl Config {
    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("reelfeed");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the user config file (or defaults), applies the environment
    /// overrides and validates the result.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
            tracing::info!(path = ?config_path, "wrote default config");
        }

        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config
            .validate()
            .with_context(|| format!("Invalid config at {:?}", config_path))?;
        if config.baas.db_url().is_none() {
            tracing::warn!(
                path = ?config_path,
                "no baas.project_id (or {}) set, the feed will only hold generated cards",
                ENV_PROJECT_ID
            );
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {:?}", path))?;

            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

            return Ok(config);
        }

        Ok(Config::default())
    }

    /// Project id and token may come from the environment instead of the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup(ENV_PROJECT_ID).filter(|v| !v.trim().is_empty()) {
            self.baas.project_id = project_id;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.baas.token = token;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_count == 0 {
            bail!("initial_count must be at least 1");
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if !(1.0..=2.0).contains(&self.load_threshold) {
            bail!(
                "load_threshold must be between 1.0 and 2.0 (got {})",
                self.load_threshold
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
