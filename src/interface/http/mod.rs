mod gate;
mod handlers;
mod routes;

pub use gate::ChannelGate;
pub use handlers::AppState;
pub use routes::create_router;
