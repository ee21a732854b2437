//! Grouped summary views for the stockdash pipeline.
//!
//! This crate handles:
//! - Ticker selection and per-ticker gap detection
//! - Daily and ISO-weekly views
//! - Ticker, sector and exchange views
//! - Note classification and the notes view

pub mod stats;
pub mod gaps;
pub mod selection;
pub mod daily;
pub mod weekly;
pub mod ticker;
pub mod category;
pub mod notes;
pub mod engine;

pub use stats::GroupStats;
pub use gaps::GapDetector;
pub use selection::Selection;
pub use notes::NoteClassifier;
pub use engine::Aggregator;
