pub mod albums;
pub mod app;
pub mod auth;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;

#[cfg(test)]
mod test_utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
