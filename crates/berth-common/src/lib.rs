//! # berth-common
//!
//! Shared types, error definitions, project configuration, and constants
//! used across the berth workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the primitives the translation core and the
//! CLI build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
