//! Triad values and metrics
//!
//! The triad (∆ structure, ∞ abstraction, Θ concreteness) is the low-dimensional
//! auxiliary signal attached to every scored text.

pub mod metrics;
pub mod value;

pub use metrics::alignment_score;
pub use value::{parse_bias, TriadPreset, TriadValue};
