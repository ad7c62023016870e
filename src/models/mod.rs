//! Pure revenue-share and staffing primitives.
//!
//! Everything here is a small, side-effect-free function so the projection code
//! can stay a straight-line monthly loop.

pub mod allocation;
pub mod hiring;
pub mod slabs;

pub use allocation::*;
pub use hiring::*;
pub use slabs::*;
