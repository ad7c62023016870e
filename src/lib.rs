//! `aop-projections` library crate.
//!
//! The binary (`aop`) is a thin wrapper around this library so that:
//!
//! - the projection engine is testable without spawning processes
//! - the engine (`domain`, `models`, `projection`, `report`) has no I/O and can
//!   be driven by other front-ends

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod models;
pub mod projection;
pub mod report;
