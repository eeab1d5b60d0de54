use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operator-configured descriptor for one monitored container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerTarget {
    pub name: String,
    pub ip: String,
    pub port: String,
    pub secret: String,
}

impl ContainerTarget {
    pub fn new(
        name: impl Into<String>,
        ip: impl Into<String>,
        port: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            port: port.into(),
            secret: secret.into(),
        }
    }
}

/// A name appeared more than once in the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate target container '{0}'")]
pub struct DuplicateTarget(pub String);

/// The set of containers this service may report on or act upon.
///
/// Read-only after startup. Iteration follows configuration order.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<ContainerTarget>,
}

impl TargetRegistry {
    /// Builds a registry, rejecting the first duplicated name.
    pub fn new(targets: Vec<ContainerTarget>) -> Result<Self, DuplicateTarget> {
        for (i, target) in targets.iter().enumerate() {
            if targets[..i].iter().any(|t| t.name == target.name) {
                return Err(DuplicateTarget(target.name.clone()));
            }
        }
        Ok(Self { targets })
    }

    pub fn get(&self, name: &str) -> Option<&ContainerTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerTarget> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
