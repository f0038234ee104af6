//! Reporter module for output formatting

pub mod console;
pub mod distribution;
pub mod json;
pub mod svg;

pub use console::ConsoleReporter;
pub use distribution::DistributionSvgReporter;
pub use json::JsonReporter;
pub use svg::SvgReporter;
