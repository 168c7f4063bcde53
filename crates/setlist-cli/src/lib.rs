//! Setlist service front ends
//!
//! The HTTP API served by `setlist-server`, and JSON output helpers shared
//! by the command-line tools.

pub mod api;
pub mod output;

pub use api::{build_router, AppState, BuildInfo};
