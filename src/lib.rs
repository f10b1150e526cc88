pub mod auth;
pub mod common;
pub mod config;
pub mod database;
pub mod errors;
pub mod services;

#[cfg(feature = "graphql")]
pub mod graphql;
