//! ROULETTE: American roulette simulator and Martingale strategy runner.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod wheel;
pub mod bet;
pub mod engine;
pub mod strategy;
pub mod storage;
