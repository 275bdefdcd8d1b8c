//! Core of the prize wheel: weighted outcome selection, spin planning,
//! and the single-spin session state machine.

pub mod clock;
pub mod config;
pub mod easing;
pub mod error;
pub mod event;
pub mod outcome;
pub mod planner;
pub mod rng;
pub mod session;
pub mod state;
pub mod stats;
pub mod store;
pub mod types;
