//! classdown: lowers class constructs into constructor functions, shared
//! method tables and an explicit instantiation protocol.
//!
//! The engine itself lives in `classdown-desugar`; this crate re-exports it
//! and adds the runnable scenarios and tracing setup used by the
//! `classdown` binary.

pub use classdown_common as common;
pub use classdown_desugar as desugar;

pub mod demos;

pub mod tracing_config;

#[cfg(test)]
#[path = "tests/demos_tests.rs"]
mod demos_tests;

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;
