//! Common types and utilities for the tsg structural guard compiler.
//!
//! This crate provides foundational types used across all tsg crates:
//! - String interning (`Atom`, `Interner`)
//! - Centralized limits and thresholds

// String interning for member-name and parameter-name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;
