//! Reusable widget components.

pub mod detail;
pub mod status;

pub use detail::{DetailField, DetailPanel, DetailSection, DetailStyle};
pub use status::StatusIndicator;
