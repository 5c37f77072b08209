//! Common types and utilities for the classdown class desugaring engine.
//!
//! This crate provides foundational types shared by the engine and its
//! drivers:
//! - Property keys (`PropertyKey`, `Symbol`, `SymbolId`)
//! - Runtime limits and thresholds

// Property keys - strings or unique symbols
pub mod key;
pub use key::{PropertyKey, Symbol, SymbolId};

// Centralized limits and thresholds
pub mod limits;
