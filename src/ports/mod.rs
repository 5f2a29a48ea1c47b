//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the analyses and wherever the dataset lives.

mod source;

pub use source::RecordSource;
