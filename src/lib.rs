pub mod app;
pub mod auth;
pub mod classic;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod secrets;
pub mod validation;

pub use app::{build_router, AppState};
