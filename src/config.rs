use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::debounce::SEARCH_DEBOUNCE;
use crate::pagination::DEFAULT_SIBLING_COUNT;

const APP_NAME: &str = "holoswap";
const DATABASE_FILE_DEFAULT: &str = "holoswap.db";
pub const POKEMON_TCG_API_URL: &str = "https://api.pokemontcg.io/v2";
pub const API_PAGE_SIZE: i64 = 40;
pub const CLIENT_SIDE_PAGE_SIZE: usize = 24;

pub const ENV_API_KEY: &str = "POKEMON_TCG_API_KEY";
pub const ENV_DATA_DIR: &str = "HOLOSWAP_DATA_DIR";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
  pub data_dir: PathBuf,
  pub database_file: String,
  pub api_base_url: String,
  pub api_key: Option<String>,
  pub request_timeout_secs: u64,
  pub api_page_size: i64,
  pub local_page_size: usize,
  pub pagination_siblings: i64,
  pub search_debounce_ms: u64,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
      database_file: DATABASE_FILE_DEFAULT.to_string(),
      api_base_url: POKEMON_TCG_API_URL.to_string(),
      api_key: None,
      request_timeout_secs: 30,
      api_page_size: API_PAGE_SIZE,
      local_page_size: CLIENT_SIDE_PAGE_SIZE,
      pagination_siblings: DEFAULT_SIBLING_COUNT,
      search_debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
    }
  }
}

impl AppConfig {
  /// Defaults overridden by `POKEMON_TCG_API_KEY` and `HOLOSWAP_DATA_DIR`.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    config.apply_env();
    config
  }

  /// Reads a JSON config file; fields it leaves out keep their defaults.
  pub fn load(path: &Path) -> Result<Self, String> {
    let body = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut config: AppConfig = serde_json::from_str(&body)
      .map_err(|e| format!("Invalid config file {}: {}", path.display(), e))?;
    config.apply_env();
    Ok(config)
  }

  pub fn db_path(&self) -> PathBuf {
    self.data_dir.join(&self.database_file)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn search_debounce(&self) -> Duration {
    Duration::from_millis(self.search_debounce_ms)
  }

  fn apply_env(&mut self) {
    if let Some(key) = non_empty_env(ENV_API_KEY) {
      self.api_key = Some(key);
    }
    if let Some(dir) = non_empty_env(ENV_DATA_DIR) {
      self.data_dir = PathBuf::from(dir);
    }
  }
}

fn non_empty_env(name: &str) -> Option<String> {
  env::var(name)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

fn default_data_dir() -> PathBuf {
  dirs::data_local_dir()
    .map(|dir| dir.join(APP_NAME))
    .unwrap_or_else(|| PathBuf::from("."))
}
