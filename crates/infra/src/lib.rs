//! Infrastructure layer: stores, database wiring, configuration and the
//! application services that orchestrate them.

pub mod config;
pub mod db;
pub mod services;
pub mod store;
