pub mod excel;
pub mod preview;
pub mod sniff;
pub mod source;
pub mod stats;

// Re-export key types for convenience
pub use preview::render_preview;
pub use source::{DataError, Dataset};
