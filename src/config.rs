//! Client configuration model.
//!
//! Derives `Serialize`/`Deserialize` for TOML persistence. Every field has a
//! default so a config file only needs to name what it changes. The config is
//! owned by the [`Client`](crate::Client) and is locked against mutation
//! while a connection is open; the setters live on the client for that
//! reason.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection parameters for one IRC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server hostname or address.
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Used both as the USER name and the NICK.
    pub username: String,
    #[serde(default)]
    pub realname: String,
    /// Answer inbound PING with PONG automatically.
    #[serde(default = "default_true")]
    pub auto_pong: bool,
    /// Register with user mode 8 (invisible) instead of 0.
    #[serde(default)]
    pub invisible: bool,
    /// Keepalive PING interval in seconds.
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

fn default_port() -> u16 {
    6667
}

fn default_true() -> bool {
    true
}

fn default_keepalive_secs() -> u64 {
    60
}

impl ClientConfig {
    /// Config with the given endpoint and identity, defaults elsewhere.
    pub fn new(
        server: impl Into<String>,
        port: u16,
        username: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            port,
            username: username.into(),
            realname: String::new(),
            auto_pong: true,
            invisible: false,
            keepalive_secs: default_keepalive_secs(),
        }
    }
}

/// Load a [`ClientConfig`] from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: ClientConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config file")?;
    Ok(config)
}

/// Write a [`ClientConfig`] to a TOML file.
pub fn save_config(path: impl AsRef<Path>, config: &ClientConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_defaults() {
        let cfg = ClientConfig::new("irc.example.net", 6667, "alice");
        assert_eq!(cfg.server, "irc.example.net");
        assert_eq!(cfg.username, "alice");
        assert_eq!(cfg.realname, "");
        assert!(cfg.auto_pong);
        assert!(!cfg.invisible);
        assert_eq!(cfg.keepalive_secs, 60);
    }

    #[test]
    fn test_toml_defaults_apply_to_missing_fields() {
        let cfg: ClientConfig = toml::from_str(
            r#"
            server = "irc.example.net"
            username = "alice"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.port, 6667);
        assert!(cfg.auto_pong);
        assert!(!cfg.invisible);
        assert_eq!(cfg.keepalive_secs, 60);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut cfg = ClientConfig::new("irc.example.net", 6697, "alice");
        cfg.realname = "Alice A.".into();
        cfg.invisible = true;
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.server, cfg.server);
        assert_eq!(back.port, cfg.port);
        assert_eq!(back.realname, "Alice A.");
        assert!(back.invisible);
    }
}
