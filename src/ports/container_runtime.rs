use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ContainerHandle, StatsSnapshot};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime unavailable: {0}")]
    Unavailable(String),

    #[error("container '{0}' not found")]
    NotFound(String),

    #[error("{0}")]
    Operation(String),

    #[error("stats unavailable: {0}")]
    StatsUnavailable(String),

    #[error("runtime call timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Port for talking to the container runtime.
///
/// Implementations open a session per call and release it before returning.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List all containers (running and stopped)
    async fn list_containers(&self) -> RuntimeResult<Vec<ContainerHandle>>;

    /// Fetch fresh state for a container by name or id
    async fn get_container(&self, name: &str) -> RuntimeResult<ContainerHandle>;

    /// Re-read a handle's state; cached status goes stale between requests
    async fn reload(&self, handle: &ContainerHandle) -> RuntimeResult<ContainerHandle> {
        self.get_container(handle.id.as_str()).await
    }

    async fn start(&self, handle: &ContainerHandle) -> RuntimeResult<()>;

    async fn stop(&self, handle: &ContainerHandle) -> RuntimeResult<()>;

    async fn restart(&self, handle: &ContainerHandle) -> RuntimeResult<()>;

    /// Last `tail` log lines, oldest first
    async fn fetch_logs(&self, handle: &ContainerHandle, tail: usize) -> RuntimeResult<Vec<String>>;

    /// One-shot resource sample
    async fn fetch_stats(&self, handle: &ContainerHandle) -> RuntimeResult<StatsSnapshot>;
}
