//! PARLAY: daily best-hit-rate parlay builder
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod odds;
pub mod estimator;
pub mod data;
pub mod engine;
pub mod storage;
pub mod history;
pub mod dashboard;
