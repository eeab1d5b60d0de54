use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use super::tables::{build_stats_table, build_status_table};
use crate::domain::format::{clip, keep_tail};
use crate::domain::{Action, ContainerHandle, TargetRegistry};
use crate::ports::{ContainerRuntime, RuntimeError};

/// Number of log lines requested from the runtime
pub const LOG_TAIL_LINES: usize = 30;
/// Upper bound on characters returned for a logs request
pub const LOG_MAX_CHARS: usize = 1900;
const DIAGNOSTIC_MAX_CHARS: usize = 200;

/// Failures recovered at the command boundary.
///
/// `Display` is the reply text sent back to the channel.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Please specify a container name for the '{0}' command.")]
    MissingName(String),

    #[error("Container '{0}' is not in the list of monitored containers or may be misspelled.")]
    NotMonitored(String),

    #[error("Container '{0}' not found by Podman.")]
    NotFound(String),

    #[error("Error accessing container '{name}': {detail}")]
    Access { name: String, detail: String },

    #[error("Error performing {action} on container '{name}': {detail}")]
    Operation {
        action: String,
        name: String,
        detail: String,
    },

    #[error("Unable to reach the container runtime: {0}")]
    RuntimeUnavailable(String),
}

impl CommandError {
    fn operation(action: &Action, name: &str, err: RuntimeError) -> Self {
        Self::Operation {
            action: action.to_string(),
            name: name.to_string(),
            detail: clip(&err.to_string(), DIAGNOSTIC_MAX_CHARS),
        }
    }
}

/// Maps one action onto the runtime.
///
/// Stateless between calls: the registry is shared read-only and every runtime
/// interaction happens inside the call that needs it.
pub struct CommandEngine {
    registry: Arc<TargetRegistry>,
    runtime: Arc<dyn ContainerRuntime>,
}

impl CommandEngine {
    pub fn new(registry: Arc<TargetRegistry>, runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { registry, runtime }
    }

    /// Runs `action`. An `Err` carries the reply text in its `Display`.
    pub async fn execute(&self, action: &Action, container_name: Option<&str>) -> Result<String, CommandError> {
        info!(action = %action, container = container_name.unwrap_or("-"), "Executing command");

        let result = match action {
            Action::Status => self.status().await,
            Action::Stats => self.stats().await,
            _ => self.run_on_container(action, container_name.unwrap_or("")).await,
        };

        if let Err(e) = &result {
            warn!(action = %action, error = %e, "Command failed");
        }
        result
    }

    async fn status(&self) -> Result<String, CommandError> {
        let live = self
            .runtime
            .list_containers()
            .await
            .map_err(|e| CommandError::RuntimeUnavailable(e.to_string()))?;
        Ok(build_status_table(&self.registry, &live, self.runtime.as_ref()).await)
    }

    async fn stats(&self) -> Result<String, CommandError> {
        // Probe once so an unreachable runtime reads as one message instead of
        // a table of error rows.
        self.runtime
            .list_containers()
            .await
            .map_err(|e| CommandError::RuntimeUnavailable(e.to_string()))?;
        Ok(build_stats_table(&self.registry, self.runtime.as_ref()).await)
    }

    async fn run_on_container(&self, action: &Action, name: &str) -> Result<String, CommandError> {
        // VALIDATE_NAME
        if name.is_empty() {
            if action.needs_container() {
                return Err(CommandError::MissingName(action.to_string()));
            }
            return Ok(format!("Action '{}' is unknown or not applicable.", action));
        }
        if !self.registry.contains(name) {
            return Err(CommandError::NotMonitored(name.to_string()));
        }

        // RESOLVE_HANDLE
        let handle = self.resolve(name).await?;

        // APPLY_ACTION
        self.apply(action, name, &handle).await.map_err(|e| {
            error!(action = %action, container = %name, error = %e, "Runtime rejected action");
            CommandError::operation(action, name, e)
        })
    }

    async fn resolve(&self, name: &str) -> Result<ContainerHandle, CommandError> {
        match self.runtime.get_container(name).await {
            Ok(handle) => Ok(handle),
            Err(RuntimeError::NotFound(_)) => Err(CommandError::NotFound(name.to_string())),
            Err(e) => Err(CommandError::Access {
                name: name.to_string(),
                detail: clip(&e.to_string(), DIAGNOSTIC_MAX_CHARS),
            }),
        }
    }

    async fn apply(&self, action: &Action, name: &str, handle: &ContainerHandle) -> Result<String, RuntimeError> {
        match action {
            Action::Restart => {
                self.runtime.restart(handle).await?;
                Ok(format!("Container '{}' restarted successfully.", name))
            }
            Action::Start if handle.status.is_exited() => {
                self.runtime.start(handle).await?;
                Ok(format!("Container '{}' started successfully.", name))
            }
            Action::Start => Ok(format!(
                "Container '{}' is already {}; nothing to start.",
                name, handle.status
            )),
            Action::Stop if handle.status.is_running() => {
                self.runtime.stop(handle).await?;
                Ok(format!("Container '{}' stopped successfully.", name))
            }
            Action::Stop => Ok(format!(
                "Container '{}' is not running (status: {}); nothing to stop.",
                name, handle.status
            )),
            Action::Logs => {
                let lines = self.runtime.fetch_logs(handle, LOG_TAIL_LINES).await?;
                let joined = lines.join("\n");
                Ok(keep_tail(&joined, LOG_MAX_CHARS).to_string())
            }
            other => Ok(format!(
                "Action '{}' is unknown or not applicable to container '{}'.",
                other, name
            )),
        }
    }
}
