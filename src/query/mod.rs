//! Query pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! raw query string
//!     → params.rs (decode into ordered pairs)
//!     → pipeline.rs (for each transform, in order: first value or None → handler)
//!     → per-request result mutated in place
//! ```
//!
//! # Design Decisions
//! - Handlers always run; absence is passed as `None`
//! - Handlers only ever see the per-request copy
//! - Not used for dynamic routes

pub mod params;
pub mod pipeline;
pub mod transforms;

pub use params::QueryParams;
pub use pipeline::{apply, QueryTransform, TransformFn};
