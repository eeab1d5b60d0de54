use std::collections::HashSet;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::{ContainerTarget, DuplicateTarget, TargetRegistry};

/// Marker in the targets file for "this host's public address"
pub const PUBLIC_IP_MARKER: &str = "public";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub podman_socket: String,
    pub targets_path: PathBuf,
    pub runtime_timeout: Duration,
    pub ingress_token: Option<String>,
    pub bot_user_id: u64,
    pub allowed_guilds: HashSet<u64>,
    pub allowed_channels: HashSet<u64>,
    pub public_ip_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PODWARDEN_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            log_level: env::var("PODWARDEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            podman_socket: env::var("PODMAN_SOCKET")
                .unwrap_or_else(|_| "unix:///run/podman/podman.sock".to_string()),
            targets_path: env::var("PODWARDEN_TARGETS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("targets.toml")),
            runtime_timeout: parse_timeout(env::var("PODWARDEN_RUNTIME_TIMEOUT").ok().as_deref()),
            ingress_token: env::var("PODWARDEN_INGRESS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            bot_user_id: env::var("PODWARDEN_BOT_USER_ID")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            allowed_guilds: parse_id_list(&env::var("PODWARDEN_ALLOWED_GUILDS").unwrap_or_default()),
            allowed_channels: parse_id_list(
                &env::var("PODWARDEN_ALLOWED_CHANNELS").unwrap_or_default(),
            ),
            public_ip_url: env::var("PODWARDEN_PUBLIC_IP_URL")
                .unwrap_or_else(|_| "https://api.ipify.org?format=json".to_string()),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("podman_socket", &self.podman_socket)
            .field("targets_path", &self.targets_path)
            .field("runtime_timeout", &self.runtime_timeout)
            .field("ingress_token", &self.ingress_token.as_ref().map(|_| "<redacted>"))
            .field("bot_user_id", &self.bot_user_id)
            .field("allowed_guilds", &self.allowed_guilds)
            .field("allowed_channels", &self.allowed_channels)
            .field("public_ip_url", &self.public_ip_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Runtime call timeout in whole seconds, never below one second.
pub fn parse_timeout(raw: Option<&str>) -> Duration {
    let secs = raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(30);
    Duration::from_secs(secs.max(1))
}

/// Comma-separated numeric ids; anything unparseable is skipped.
pub fn parse_id_list(raw: &str) -> HashSet<u64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse targets file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    DuplicateTarget(#[from] DuplicateTarget),
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    name: String,
    ip: Option<String>,
    #[serde(default)]
    port: String,
    #[serde(default)]
    secret: String,
}

impl TargetEntry {
    fn wants_public_ip(&self) -> bool {
        self.ip
            .as_deref()
            .map_or(true, |ip| ip.trim().eq_ignore_ascii_case(PUBLIC_IP_MARKER))
    }
}

/// Parsed targets file, before public addresses are filled in
#[derive(Debug, Default, Deserialize)]
pub struct TargetsFile {
    #[serde(default)]
    containers: Vec<TargetEntry>,
    #[serde(default)]
    pub flavor_lines: Vec<String>,
}

impl TargetsFile {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads the file; a missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Targets file not found, no containers will be monitored");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn needs_public_ip(&self) -> bool {
        self.containers.iter().any(TargetEntry::wants_public_ip)
    }

    /// Builds the registry, substituting `public_ip` wherever it was requested.
    pub fn into_registry(self, public_ip: &str) -> Result<TargetRegistry, ConfigError> {
        let targets = self
            .containers
            .into_iter()
            .map(|entry| {
                let ip = if entry.wants_public_ip() {
                    public_ip.to_string()
                } else {
                    entry.ip.unwrap_or_default()
                };
                ContainerTarget::new(entry.name, ip, entry.port, entry.secret)
            })
            .collect();

        Ok(TargetRegistry::new(targets)?)
    }
}
