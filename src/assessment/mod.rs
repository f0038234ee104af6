//! Assessment module - Kano curves, feature evaluation and quadrant analysis

pub mod curves;
pub mod engine;
pub mod quadrant;

pub use engine::{evaluate, AssessmentEngine, Evaluation};
pub use quadrant::{max_area_per_quadrant, quadrant_breakdown};
