mod client;

pub use client::PodmanAdapter;
