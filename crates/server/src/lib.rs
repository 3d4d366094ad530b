pub mod api;
pub mod logging;
pub mod metrics;
pub mod state;
