//! Demo web app that shortens URLs through an OAuth-protected API using a
//! platform-issued access token.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod core;
pub mod shortener;
pub mod transport;
mod utils;

pub use utils::ServerError;
