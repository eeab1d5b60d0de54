//! In-memory runtime used by tests.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{ContainerHandle, ContainerStatus, StatsSnapshot};
use crate::ports::{ContainerRuntime, RuntimeError, RuntimeResult};

struct Entry {
    handle: ContainerHandle,
    logs: Vec<String>,
    stats: Option<StatsSnapshot>,
}

/// Scriptable runtime that records every call it receives
#[derive(Default)]
pub struct MemoryRuntime {
    containers: RwLock<Vec<Entry>>,
    calls: RwLock<Vec<String>>,
    unavailable: bool,
    failing_reloads: HashSet<String>,
    failing_operations: HashMap<String, String>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime whose socket cannot be reached
    pub fn unreachable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_container(self, name: &str, status: ContainerStatus) -> Self {
        self.containers.write().unwrap().push(Entry {
            handle: ContainerHandle::new(format!("id-{}", name), name, status),
            logs: Vec::new(),
            stats: None,
        });
        self
    }

    pub fn with_logs(self, name: &str, logs: Vec<String>) -> Self {
        self.entry_mut(name, |entry| entry.logs = logs);
        self
    }

    pub fn with_stats(self, name: &str, stats: StatsSnapshot) -> Self {
        self.entry_mut(name, |entry| entry.stats = Some(stats));
        self
    }

    pub fn with_failing_reload(mut self, name: &str) -> Self {
        self.failing_reloads.insert(name.to_string());
        self
    }

    pub fn with_failing_operation(mut self, name: &str, message: &str) -> Self {
        self.failing_operations.insert(name.to_string(), message.to_string());
        self
    }

    /// Every call received so far, as `"<op>"` or `"<op>:<name>"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Mutating calls only (start/stop/restart)
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("start:") || c.starts_with("stop:") || c.starts_with("restart:"))
            .collect()
    }

    pub fn status_of(&self, name: &str) -> Option<ContainerStatus> {
        self.containers
            .read()
            .unwrap()
            .iter()
            .find(|e| e.handle.name == name)
            .map(|e| e.handle.status.clone())
    }

    fn entry_mut(&self, name: &str, apply: impl FnOnce(&mut Entry)) {
        let mut containers = self.containers.write().unwrap();
        if let Some(entry) = containers.iter_mut().find(|e| e.handle.name == name) {
            apply(entry);
        }
    }

    fn record(&self, call: String) -> RuntimeResult<()> {
        self.calls.write().unwrap().push(call);
        if self.unavailable {
            return Err(RuntimeError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn lookup(&self, key: &str) -> RuntimeResult<ContainerHandle> {
        self.containers
            .read()
            .unwrap()
            .iter()
            .find(|e| e.handle.name == key || e.handle.id.as_str() == key)
            .map(|e| e.handle.clone())
            .ok_or_else(|| RuntimeError::NotFound(key.to_string()))
    }

    fn mutate(&self, op: &str, handle: &ContainerHandle, status: Option<ContainerStatus>) -> RuntimeResult<()> {
        self.record(format!("{}:{}", op, handle.name))?;
        if let Some(message) = self.failing_operations.get(&handle.name) {
            return Err(RuntimeError::Operation(message.clone()));
        }
        if let Some(status) = status {
            self.entry_mut(&handle.name, |entry| entry.handle.status = status);
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerRuntime for MemoryRuntime {
    async fn list_containers(&self) -> RuntimeResult<Vec<ContainerHandle>> {
        self.record("list".to_string())?;
        Ok(self.containers.read().unwrap().iter().map(|e| e.handle.clone()).collect())
    }

    async fn get_container(&self, name: &str) -> RuntimeResult<ContainerHandle> {
        self.record(format!("get:{}", name))?;
        self.lookup(name)
    }

    async fn reload(&self, handle: &ContainerHandle) -> RuntimeResult<ContainerHandle> {
        self.record(format!("reload:{}", handle.name))?;
        if self.failing_reloads.contains(&handle.name) {
            return Err(RuntimeError::Operation("inspect failed".to_string()));
        }
        self.lookup(handle.id.as_str())
    }

    async fn start(&self, handle: &ContainerHandle) -> RuntimeResult<()> {
        self.mutate("start", handle, Some(ContainerStatus::Running))
    }

    async fn stop(&self, handle: &ContainerHandle) -> RuntimeResult<()> {
        self.mutate("stop", handle, Some(ContainerStatus::Exited))
    }

    async fn restart(&self, handle: &ContainerHandle) -> RuntimeResult<()> {
        self.mutate("restart", handle, Some(ContainerStatus::Running))
    }

    async fn fetch_logs(&self, handle: &ContainerHandle, tail: usize) -> RuntimeResult<Vec<String>> {
        self.record(format!("logs:{}", handle.name))?;
        if let Some(message) = self.failing_operations.get(&handle.name) {
            return Err(RuntimeError::Operation(message.clone()));
        }
        let containers = self.containers.read().unwrap();
        let logs = containers
            .iter()
            .find(|e| e.handle.name == handle.name)
            .map(|e| e.logs.clone())
            .unwrap_or_default();
        let skip = logs.len().saturating_sub(tail);
        Ok(logs.into_iter().skip(skip).collect())
    }

    async fn fetch_stats(&self, handle: &ContainerHandle) -> RuntimeResult<StatsSnapshot> {
        self.record(format!("stats:{}", handle.name))?;
        self.containers
            .read()
            .unwrap()
            .iter()
            .find(|e| e.handle.name == handle.name)
            .and_then(|e| e.stats.clone())
            .ok_or_else(|| RuntimeError::StatsUnavailable("empty stats list".to_string()))
    }
}
