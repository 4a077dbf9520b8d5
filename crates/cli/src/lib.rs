//! Shiprate command-line tools.
//!
//! Loads rate tables and surcharge schedules from YAML and runs the pricing
//! logic from `shiprate-core` against them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod config;
pub mod loader;
pub mod logging;
