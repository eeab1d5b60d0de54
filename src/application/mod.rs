pub mod dispatcher;
pub mod engine;
pub mod tables;

pub use dispatcher::Dispatcher;
pub use engine::CommandEngine;
