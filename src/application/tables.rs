//! Status and stats tables over the target registry.
//!
//! Each registry entry becomes exactly one row. A failure while resolving one
//! container turns into an error row for that entry and never shortens the
//! table.

use futures::future::join_all;
use tracing::warn;

use crate::domain::format::{
    clip, format_byte_count, format_cpu_percent, format_cpu_time, truncate_name, NOT_AVAILABLE,
};
use crate::domain::{ContainerHandle, ContainerStatus, ContainerTarget, StatsSnapshot, TargetRegistry};
use crate::ports::{ContainerRuntime, RuntimeError};

const STATUS_RULE: &str = "+-------------------+---------+---------------+--------+------------+";
const STATUS_TITLES: &str = "| Server/Container  | Status  | IP            | Port   | Password   |";

const NAME_WIDTH: usize = 17;
const DISPLAY_NAME_MAX: usize = 20;
const DIAGNOSTIC_MAX: usize = 10;

/// Outcome of resolving one registry entry for the status table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCell {
    Live(ContainerStatus),
    NotFound,
    Error(String),
}

impl StatusCell {
    pub fn label(&self) -> &str {
        match self {
            Self::Live(status) => status.table_label(),
            Self::NotFound => "not found",
            Self::Error(_) => "error",
        }
    }
}

/// Outcome of sampling one registry entry for the stats table
#[derive(Debug, Clone, PartialEq)]
pub enum StatsRow {
    Live { name: String, snapshot: StatsSnapshot },
    NotFound { name: String },
    Error { name: String, diagnostic: String },
}

impl StatsRow {
    pub fn render(&self) -> String {
        match self {
            Self::Live { name, snapshot } => build_stats_row(snapshot, name),
            Self::NotFound { name } => stats_line(
                &truncate_name(name, DISPLAY_NAME_MAX),
                NOT_AVAILABLE,
                "Not Found",
                NOT_AVAILABLE,
                NOT_AVAILABLE,
                NOT_AVAILABLE,
            ),
            Self::Error { name, diagnostic } => stats_line(
                &truncate_name(name, DISPLAY_NAME_MAX),
                "Error",
                &clip(diagnostic, DIAGNOSTIC_MAX),
                NOT_AVAILABLE,
                NOT_AVAILABLE,
                NOT_AVAILABLE,
            ),
        }
    }
}

fn stats_line(name: &str, cpu: &str, cpu_time: &str, memory: &str, net: &str, block: &str) -> String {
    format!(
        "{:<20} {:<7} {:<10} {:<20} {:<19} {:<20}",
        name, cpu, cpu_time, memory, net, block
    )
}

/// Header line of the stats table
pub fn stats_header() -> String {
    stats_line(
        "NAME",
        "CPU %",
        "CPU TIME",
        "MEM USAGE / LIMIT",
        "NET I/O (RX/TX)",
        "BLOCK I/O (R/W)",
    )
}

/// Renders one container's snapshot. Missing counters degrade per field.
pub fn build_stats_row(snapshot: &StatsSnapshot, display_name: &str) -> String {
    let memory = format!(
        "{} / {}",
        format_byte_count(snapshot.mem_usage.unwrap_or(0)),
        format_byte_count(snapshot.mem_limit.unwrap_or(0))
    );
    let (rx, tx) = snapshot.network_totals();
    let net = format!("{} / {}", format_byte_count(rx), format_byte_count(tx));
    let block = format!(
        "{} / {}",
        format_byte_count(snapshot.block_input.unwrap_or(0)),
        format_byte_count(snapshot.block_output.unwrap_or(0))
    );

    stats_line(
        &truncate_name(display_name, DISPLAY_NAME_MAX),
        &format_cpu_percent(snapshot.cpu_percent),
        &format_cpu_time(snapshot.cpu_nanos),
        &memory,
        &net,
        &block,
    )
}

fn status_line(target: &ContainerTarget, cell: &StatusCell) -> String {
    format!(
        "| {:<17} | {:<7} | {:<13} | {:<6} | {:<10} |",
        clip(&target.name, NAME_WIDTH),
        cell.label(),
        target.ip,
        target.port,
        target.secret
    )
}

async fn resolve_status(
    target: &ContainerTarget,
    live: &[ContainerHandle],
    runtime: &dyn ContainerRuntime,
) -> StatusCell {
    let Some(handle) = live.iter().find(|h| h.name == target.name) else {
        return StatusCell::NotFound;
    };

    match runtime.reload(handle).await {
        Ok(fresh) => StatusCell::Live(fresh.status),
        Err(RuntimeError::NotFound(_)) => StatusCell::NotFound,
        Err(e) => {
            warn!(container = %target.name, error = %e, "Failed to refresh container status");
            StatusCell::Error(e.to_string())
        }
    }
}

/// Boxed status table, one row per registry entry in registry order.
pub async fn build_status_table(
    registry: &TargetRegistry,
    live: &[ContainerHandle],
    runtime: &dyn ContainerRuntime,
) -> String {
    let cells = join_all(registry.iter().map(|target| resolve_status(target, live, runtime))).await;

    let mut lines = vec![STATUS_RULE.to_string(), STATUS_TITLES.to_string(), STATUS_RULE.to_string()];
    lines.extend(
        registry
            .iter()
            .zip(cells.iter())
            .map(|(target, cell)| status_line(target, cell)),
    );
    lines.push(STATUS_RULE.to_string());
    lines.join("\n")
}

async fn sample_stats(target: &ContainerTarget, runtime: &dyn ContainerRuntime) -> StatsRow {
    let name = target.name.clone();
    let handle = match runtime.get_container(&target.name).await {
        Ok(handle) => handle,
        Err(RuntimeError::NotFound(_)) => return StatsRow::NotFound { name },
        Err(e) => {
            warn!(container = %name, error = %e, "Failed to resolve container for stats");
            return StatsRow::Error {
                name,
                diagnostic: e.to_string(),
            };
        }
    };

    match runtime.fetch_stats(&handle).await {
        Ok(snapshot) => StatsRow::Live { name, snapshot },
        Err(e) => {
            warn!(container = %name, error = %e, "Failed to fetch container stats");
            StatsRow::Error {
                name,
                diagnostic: e.to_string(),
            }
        }
    }
}

/// Samples every registry entry; row order follows the registry.
pub async fn collect_stats_rows(registry: &TargetRegistry, runtime: &dyn ContainerRuntime) -> Vec<StatsRow> {
    join_all(registry.iter().map(|target| sample_stats(target, runtime))).await
}

pub async fn build_stats_table(registry: &TargetRegistry, runtime: &dyn ContainerRuntime) -> String {
    let rows = collect_stats_rows(registry, runtime).await;
    let header = stats_header();
    let rule = "-".repeat(header.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(header);
    lines.push(rule.clone());
    lines.extend(rows.iter().map(StatsRow::render));
    lines.push(rule);
    lines.join("\n")
}
