//! HTTP surface: rate queries, carrier listing, health, metrics, frontend.

mod handlers;
mod server;

pub use handlers::{
    CarriersResponse, ErrorResponse, HealthResponse, RateRequest,
};
pub use server::{router, serve, AppState};
