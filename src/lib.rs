pub mod classify;
pub mod collectors;
pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod metrics;
pub mod models;
pub mod ui;
pub mod util;
