pub mod container_runtime;

pub use container_runtime::{ContainerRuntime, RuntimeError, RuntimeResult};
