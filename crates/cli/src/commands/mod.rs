//! CLI subcommands.
//!
//! Each command loads its inputs, runs the core pricing logic and returns a
//! serializable result; printing is left to `main`.

pub mod methods;
pub mod quote;
pub mod resolve;
pub mod validate;
