//! ednote server: HTTP API and command line over the formatting pipeline.

pub mod cli;
pub mod routes;
pub mod state;

pub use state::AppState;
