//! Efficient-frontier portfolio selector.
//!
//! Collects a time window and a set of assets, forwards them to an external
//! optimization service and renders the frontier chart and portfolio tables it
//! returns.

pub mod app;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

pub use app::create_app;
pub use config::SelectorConfig;
pub use state::AppState;
