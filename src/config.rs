use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// Custom title for the header (defaults to the API host if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the portfolio API, e.g. https://api.example.com/api/v1
  pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
  /// Delay before a search keystroke burst re-keys the list query
  #[serde(default = "default_debounce_ms")]
  pub search_debounce_ms: u64,
  /// Page size requested from paginated families
  #[serde(default)]
  pub page_size: Option<u32>,
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      search_debounce_ms: default_debounce_ms(),
      page_size: None,
    }
  }
}

fn default_debounce_ms() -> u64 {
  400
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./folio.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/folio/config.yaml
  /// 4. ~/.config/folio/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/folio/config.yaml"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("folio.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("folio").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get the API token from environment variables.
  ///
  /// Checks FOLIO_API_TOKEN first, then PORTFOLIO_API_TOKEN as fallback.
  /// An absent token means unauthenticated (token issuance is the auth
  /// service's concern, not ours).
  pub fn env_token() -> Option<String> {
    std::env::var("FOLIO_API_TOKEN")
      .or_else(|_| std::env::var("PORTFOLIO_API_TOKEN"))
      .ok()
      .filter(|t| !t.is_empty())
  }

  /// Header title: configured override or the API host.
  pub fn header_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }
    url::Url::parse(&self.api.url)
      .ok()
      .and_then(|u| u.host_str().map(String::from))
      .unwrap_or_else(|| self.api.url.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_minimal_config() {
    let config: Config =
      serde_yaml::from_str("api:\n  url: https://api.example.com/v1\n").unwrap();
    assert_eq!(config.ui.search_debounce_ms, 400);
    assert_eq!(config.header_title(), "api.example.com");
  }

  #[test]
  fn test_parse_full_config() {
    let yaml = "api:\n  url: https://api.example.com/v1\ntitle: My portfolio\nui:\n  search_debounce_ms: 250\n  page_size: 20\n";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.header_title(), "My portfolio");
    assert_eq!(config.ui.search_debounce_ms, 250);
    assert_eq!(config.ui.page_size, Some(20));
  }
}
