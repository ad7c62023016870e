//! Built-in plan data.

pub mod defaults;

pub use defaults::*;
