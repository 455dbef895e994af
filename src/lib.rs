pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod ui;
pub mod state;

pub use api::{ApiClient, DashboardBackend};
pub use app::router;
pub use config::Config;
pub use controller::DashboardController;
pub use state::AppState;
