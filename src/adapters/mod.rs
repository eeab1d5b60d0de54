#[cfg(test)]
pub mod memory;
pub mod podman;
pub mod public_ip;

pub use podman::PodmanAdapter;
pub use public_ip::resolve_public_ip;
