use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bollard::container::{
    BlkioStatsEntry, InspectContainerOptions, ListContainersOptions, LogsOptions,
    RestartContainerOptions, Stats, StatsOptions, StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::Docker;
use futures::stream::StreamExt;
use tracing::debug;

use crate::domain::{ContainerHandle, ContainerStatus, InterfaceIo, StatsSnapshot};
use crate::ports::{ContainerRuntime, RuntimeError, RuntimeResult};

/// Podman adapter speaking the Docker-compatible API through bollard.
///
/// Holds only the endpoint; every call connects, does its work and drops the
/// client before returning.
pub struct PodmanAdapter {
    socket_path: String,
    timeout: Duration,
}

impl PodmanAdapter {
    pub fn new(socket: &str, timeout: Duration) -> Self {
        Self {
            socket_path: socket.trim_start_matches("unix://").to_string(),
            timeout,
        }
    }

    fn session(&self) -> RuntimeResult<Docker> {
        Docker::connect_with_socket(
            &self.socket_path,
            self.timeout.as_secs().max(1),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeError::Unavailable(e.to_string()))
    }

    async fn bounded<T, F>(&self, call: F) -> RuntimeResult<T>
    where
        F: Future<Output = RuntimeResult<T>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| RuntimeError::Timeout(self.timeout))?
    }

    fn map_error(err: BollardError, name: &str) -> RuntimeError {
        match err {
            BollardError::DockerResponseServerError {
                status_code: 404, ..
            } => RuntimeError::NotFound(name.to_string()),
            BollardError::DockerResponseServerError { message, .. } => {
                RuntimeError::Operation(message)
            }
            other @ (BollardError::IOError { .. }
            | BollardError::SocketNotFoundError(_)
            | BollardError::HyperResponseError { .. }
            | BollardError::HyperLegacyError { .. }
            | BollardError::RequestTimeoutError) => RuntimeError::Unavailable(other.to_string()),
            other => RuntimeError::Operation(other.to_string()),
        }
    }

    fn parse_container_name(names: &Option<Vec<String>>) -> String {
        names
            .as_ref()
            .and_then(|n| n.first())
            .map(|s| s.trim_start_matches('/').to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn cpu_percent(stats: &Stats) -> Option<f64> {
        let cpu_delta = stats.cpu_stats.cpu_usage.total_usage as f64
            - stats.precpu_stats.cpu_usage.total_usage as f64;
        let system_delta = stats.cpu_stats.system_cpu_usage.unwrap_or(0) as f64
            - stats.precpu_stats.system_cpu_usage.unwrap_or(0) as f64;
        let num_cpus = stats.cpu_stats.online_cpus.unwrap_or(1) as f64;

        compute_cpu_percent(cpu_delta, system_delta, num_cpus)
    }

    fn snapshot_from_stats(stats: Stats) -> StatsSnapshot {
        let cpu_percent = Self::cpu_percent(&stats);
        let (block_input, block_output) =
            sum_block_io(stats.blkio_stats.io_service_bytes_recursive.as_deref());

        let networks = stats.networks.map(|networks| {
            networks
                .into_iter()
                .map(|(name, net)| (name, InterfaceIo::new(net.rx_bytes, net.tx_bytes)))
                .collect::<HashMap<_, _>>()
        });

        StatsSnapshot {
            cpu_percent,
            cpu_nanos: Some(stats.cpu_stats.cpu_usage.total_usage),
            mem_usage: stats.memory_stats.usage,
            mem_limit: stats.memory_stats.limit,
            networks,
            block_input,
            block_output,
        }
    }
}

fn compute_cpu_percent(cpu_delta: f64, system_delta: f64, num_cpus: f64) -> Option<f64> {
    if system_delta > 0.0 && cpu_delta >= 0.0 {
        Some((cpu_delta / system_delta) * num_cpus * 100.0)
    } else {
        None
    }
}

/// `(read, write)` totals; both absent when the runtime sent no entries.
fn sum_block_io(entries: Option<&[BlkioStatsEntry]>) -> (Option<u64>, Option<u64>) {
    let Some(entries) = entries else {
        return (None, None);
    };

    let mut read_bytes = 0u64;
    let mut write_bytes = 0u64;
    for entry in entries {
        if entry.op.eq_ignore_ascii_case("read") {
            read_bytes = read_bytes.saturating_add(entry.value);
        } else if entry.op.eq_ignore_ascii_case("write") {
            write_bytes = write_bytes.saturating_add(entry.value);
        }
    }
    (Some(read_bytes), Some(write_bytes))
}

#[async_trait]
impl ContainerRuntime for PodmanAdapter {
    async fn list_containers(&self) -> RuntimeResult<Vec<ContainerHandle>> {
        self.bounded(async {
            let client = self.session()?;
            let options = Some(ListContainersOptions::<String> {
                all: true,
                ..Default::default()
            });

            let summaries = client
                .list_containers(options)
                .await
                .map_err(|e| match Self::map_error(e, "") {
                    RuntimeError::Operation(msg) => RuntimeError::Unavailable(msg),
                    other => other,
                })?;

            Ok(summaries
                .into_iter()
                .map(|summary| {
                    let name = Self::parse_container_name(&summary.names);
                    let status = ContainerStatus::from_runtime(summary.state.as_deref().unwrap_or(""));
                    ContainerHandle::new(summary.id.unwrap_or_default(), name, status)
                })
                .collect())
        })
        .await
    }

    async fn get_container(&self, name: &str) -> RuntimeResult<ContainerHandle> {
        self.bounded(async {
            let client = self.session()?;
            let inspect = client
                .inspect_container(name, None::<InspectContainerOptions>)
                .await
                .map_err(|e| Self::map_error(e, name))?;

            let status = inspect
                .state
                .and_then(|state| state.status)
                .map(|status| ContainerStatus::from_runtime(&status.to_string()))
                .unwrap_or_else(|| ContainerStatus::Other(String::new()));
            let display_name = inspect
                .name
                .map(|n| n.trim_start_matches('/').to_string())
                .unwrap_or_else(|| name.to_string());

            Ok(ContainerHandle::new(
                inspect.id.unwrap_or_else(|| name.to_string()),
                display_name,
                status,
            ))
        })
        .await
    }

    async fn start(&self, handle: &ContainerHandle) -> RuntimeResult<()> {
        self.bounded(async {
            let client = self.session()?;
            client
                .start_container::<String>(handle.id.as_str(), None)
                .await
                .map_err(|e| Self::map_error(e, &handle.name))
        })
        .await
    }

    async fn stop(&self, handle: &ContainerHandle) -> RuntimeResult<()> {
        self.bounded(async {
            let client = self.session()?;
            client
                .stop_container(handle.id.as_str(), None::<StopContainerOptions>)
                .await
                .map_err(|e| Self::map_error(e, &handle.name))
        })
        .await
    }

    async fn restart(&self, handle: &ContainerHandle) -> RuntimeResult<()> {
        self.bounded(async {
            let client = self.session()?;
            client
                .restart_container(handle.id.as_str(), None::<RestartContainerOptions>)
                .await
                .map_err(|e| Self::map_error(e, &handle.name))
        })
        .await
    }

    async fn fetch_logs(&self, handle: &ContainerHandle, tail: usize) -> RuntimeResult<Vec<String>> {
        self.bounded(async {
            let client = self.session()?;
            let options = LogsOptions::<String> {
                stdout: true,
                stderr: true,
                tail: tail.to_string(),
                ..Default::default()
            };

            let mut stream = client.logs(handle.id.as_str(), Some(options));
            let mut raw = String::new();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| Self::map_error(e, &handle.name))?;
                raw.push_str(&String::from_utf8_lossy(&chunk.into_bytes()));
            }

            Ok(raw.lines().map(|line| line.trim().to_string()).collect())
        })
        .await
    }

    async fn fetch_stats(&self, handle: &ContainerHandle) -> RuntimeResult<StatsSnapshot> {
        self.bounded(async {
            let client = self.session()?;
            let mut stream = client.stats(
                handle.id.as_str(),
                Some(StatsOptions {
                    stream: false,
                    one_shot: true,
                }),
            );

            let stats = stream
                .next()
                .await
                .ok_or_else(|| RuntimeError::StatsUnavailable("no stats returned".to_string()))?
                .map_err(|e| RuntimeError::StatsUnavailable(e.to_string()))?;

            debug!(container = %handle.name, "Fetched stats snapshot");
            Ok(Self::snapshot_from_stats(stats))
        })
        .await
    }
}
