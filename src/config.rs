use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub page_size: u32,
    pub debounce_ms: u64,
    pub cache_freshness_secs: u64,
    pub order_by: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            debounce_ms: 400,
            cache_freshness_secs: 30,
            order_by: "postCreatedAt:desc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPostsConfig {
    pub limit: usize,
}

impl Default for TopPostsConfig {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub top_posts: TopPostsConfig,
}

impl DashboardConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                DashboardConfig::default()
            }
        } else {
            DashboardConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base) = env::var("PULSE_API_BASE") {
            if !base.trim().is_empty() {
                self.api.base_url = base;
            }
        }
        if let Ok(timeout) = env::var("PULSE_API_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.api.timeout_ms = value;
            }
        }
        if let Ok(page_size) = env::var("PULSE_PAGE_SIZE") {
            if let Ok(value) = page_size.parse::<u32>() {
                if value > 0 {
                    self.search.page_size = value;
                }
            }
        }
        if let Ok(debounce) = env::var("PULSE_DEBOUNCE_MS") {
            if let Ok(value) = debounce.parse::<u64>() {
                self.search.debounce_ms = value;
            }
        }
        if let Ok(freshness) = env::var("PULSE_CACHE_FRESHNESS_SECS") {
            if let Ok(value) = freshness.parse::<u64>() {
                self.search.cache_freshness_secs = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("DASHBOARD_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/dashboard.toml")))
}
