//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the plan calendar (`Month`, `MonthlySeries`, `SeasonalityTable`)
//! - the revenue-share schedule (`RevShareSlab`, `Threshold`)
//! - brand inputs (`SyndicationConfig`, `DiscoverConfig`, `HiringPlan`, `Brand`)
//! - the plan aggregate (`PlanConfig`) and its validation pass

pub mod brand;
pub mod lenient;
pub mod plan;
pub mod types;
pub mod validation;

pub use brand::*;
pub use plan::*;
pub use types::*;
pub use validation::*;
