//! Resolution of the backend URL and token file for the CLI.

use std::path::PathBuf;

use anyhow::Context as _;
use civic_client::ClientConfig;

/// Default token file, relative to the home directory.
const DEFAULT_TOKEN_FILE: &str = ".civic/tokens.json";

/// Client configuration from the environment, with `api_url` (from
/// `--api-url`) taking precedence over `CIVIC_API_URL`.
pub fn client_config(api_url: Option<&str>) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::from_env()?;
    match api_url {
        Some(url) => Ok(ClientConfig {
            base_url: ClientConfig::new(url)?.base_url,
            ..config
        }),
        None => Ok(config),
    }
}

/// Token file location.
///
/// | Source                 | Precedence |
/// |------------------------|------------|
/// | `--token-file`         | 1          |
/// | `CIVIC_TOKEN_FILE`     | 2          |
/// | `~/.civic/tokens.json` | 3          |
pub fn token_file(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os("CIVIC_TOKEN_FILE").filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DEFAULT_TOKEN_FILE))
}
