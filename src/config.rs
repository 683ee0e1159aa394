use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
///
/// Loaded from a YAML document (see [`Config::load`]); every field has a
/// default so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub resources: ResourceConfig,
    pub chunked: ChunkedConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where static resources are looked up.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Directory every request target is resolved against
    pub root: PathBuf,
    /// File (relative to `root`) served when a target is missing
    pub not_found: String,
    /// File served for targets ending in `/`
    pub index: String,
}

/// Pacing of chunked transfers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkedConfig {
    pub block_size: usize,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3490,
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./resources"),
            not_found: "404.html".to_string(),
            index: "index.html".to_string(),
        }
    }
}

impl Default for ChunkedConfig {
    fn default() -> Self {
        Self {
            block_size: 30,
            delay_ms: 2000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ChunkedConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Reads the YAML file named by `HEARTH_CONFIG` when that variable is set,
    /// otherwise starts from defaults. A `LISTEN` variable (`host:port`)
    /// overrides the listen address afterwards.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("HEARTH_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {path}"))?;
                Self::from_yaml(&text).with_context(|| format!("invalid config file {path}"))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen) = std::env::var("LISTEN") {
            cfg.apply_listen(&listen)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses a YAML document. Missing sections fall back to defaults.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        // serde_yaml rejects an empty document outright
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The `host:port` address the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn apply_listen(&mut self, listen: &str) -> anyhow::Result<()> {
        let (host, port) = listen
            .rsplit_once(':')
            .with_context(|| format!("LISTEN must be host:port, got {listen:?}"))?;
        self.server.port = port
            .parse()
            .with_context(|| format!("invalid port in LISTEN: {port:?}"))?;
        self.server.host = host.to_string();
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.chunked.block_size == 0 {
            bail!("chunked.block_size must be greater than zero");
        }
        Ok(())
    }
}
