pub mod aggregate;
pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod export;
pub mod extract;
pub mod handlers;
pub mod inserter;
pub mod models;
pub mod paging;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use state::AppState;
