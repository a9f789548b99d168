//! Track scheme layout.
//!
//! [`SchemeLayout::run`] assigns every spot a column and a row (its frame).
//! Tracks are classified as trees or branching tracks ([`TrackShape`]) and
//! laid out by the matching strategy; spots outside any track are appended
//! to their rows afterwards.

mod branching;
mod cursor;
mod engine;
mod shape;
mod tree;

pub use cursor::START_COLUMN;
pub use engine::{LayoutError, LayoutOutcome, SchemeLayout, SiblingOrder, by_name};
pub use shape::TrackShape;
