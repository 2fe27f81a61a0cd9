//! CRASHSIM — Crash-Game Wagering Strategy Simulator
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod config;
pub mod sim;
pub mod strategy;
pub mod types;
