/// Local client configuration
///
/// The only thing the client persists on its own machine is the address
/// of the backend; every other setting lives server-side in the config
/// table. Stored as JSON in the user's config directory:
/// - Linux: ~/.config/keepsake/config.json
/// - macOS: ~/Library/Application Support/keepsake/config.json
/// - Windows: %APPDATA%\keepsake\config.json

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. "http://192.168.1.10:5000"
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Where the config file lives
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user config directory");
        path.push("keepsake");
        path.push("config.json");
        path
    }

    /// Load the config, writing a default file on first run so the user
    /// has something to edit. A malformed file falls back to defaults
    /// rather than refusing to start.
    pub fn load() -> Self {
        let path = Self::path();
        match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("malformed client config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                let config = Self::default();
                if let Some(parent) = path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                match serde_json::to_string_pretty(&config) {
                    Ok(json) => {
                        if fs::write(&path, json).is_ok() {
                            println!("📁 Wrote default config to {}", path.display());
                        }
                    }
                    Err(err) => log::warn!("could not serialize default config: {err}"),
                }
                config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips() {
        let config = ClientConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
