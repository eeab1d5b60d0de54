use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ContainerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle status as reported by the runtime.
///
/// Only `running` and `exited` drive decisions; everything else is carried
/// verbatim so replies can name it, and shown as `unknown` in tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Exited,
    Other(String),
}

impl ContainerStatus {
    pub fn from_runtime(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "exited" => Self::Exited,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_exited(&self) -> bool {
        matches!(self, Self::Exited)
    }

    /// Collapsed form used in the status table.
    pub fn table_label(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Exited => "exited",
            Self::Other(_) => "unknown",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(raw) if raw.is_empty() => f.write_str("unknown"),
            Self::Other(raw) => f.write_str(raw),
            known => f.write_str(known.table_label()),
        }
    }
}

/// A live reference to one runtime-managed container.
///
/// The status is a point-in-time reading; reload through the runtime before
/// acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: ContainerId,
    pub name: String,
    pub status: ContainerStatus,
}

impl ContainerHandle {
    pub fn new(id: impl Into<ContainerId>, name: impl Into<String>, status: ContainerStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
        }
    }
}
