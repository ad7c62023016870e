//! Input/output helpers.
//!
//! - persisted plan state and its JSON layout (`state`)
//! - file and HTTP state stores (`store`)
//! - projection exports (CSV) (`export`)

pub mod export;
pub mod state;
pub mod store;

pub use export::*;
pub use state::*;
pub use store::*;
