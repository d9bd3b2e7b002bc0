//! Core types for anchor-kit.
//!
//! This crate provides the vocabulary shared by the solver and the layout
//! crates:
//! - Element handles, anchors, guides and capability flags
//! - Edge insets and edge selectors
//! - Constraint descriptions and ordered constraint sets
//! - Error types

pub mod constraint;
pub mod errors;
pub mod insets;
pub mod types;

pub use constraint::*;
pub use errors::*;
pub use insets::*;
pub use types::*;
