//! Track Scheme Core Types and Definitions
//!
//! This crate provides the foundational types for laying out cell-tracking
//! lineages as a track scheme. It includes:
//!
//! - **Identifiers**: spot and track identifiers ([`identifier`] module)
//! - **Spots**: tracked objects and time-oriented edges ([`spot`] module)
//! - **Lineage**: the read-only graph contract used by layout ([`lineage`] module)
//! - **Model**: a validated in-memory lineage graph ([`model`] module)
//! - **Geometry**: grid positions and their drawing coordinates ([`geometry`] module)

pub mod error;
pub mod geometry;
pub mod identifier;
pub mod lineage;
pub mod model;
pub mod spot;

pub use error::ModelError;
