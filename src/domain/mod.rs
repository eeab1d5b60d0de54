pub mod command;
pub mod container;
pub mod format;
pub mod stats;
pub mod target;

pub use command::{Action, Command};
pub use container::{ContainerHandle, ContainerStatus};
pub use stats::{InterfaceIo, StatsSnapshot};
pub use target::{ContainerTarget, DuplicateTarget, TargetRegistry};
