/// Interfaces Layer - External Entry Points
///
/// ## Modules
/// - `http`: axum REST + WebSocket surface
/// - `cli`: command-line configuration and server bootstrap

pub mod cli;
pub mod http;
