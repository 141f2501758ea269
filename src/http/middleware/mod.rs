//! Middleware composed in front of the mock routes.
//!
//! # Order
//! ```text
//! request id → CORS → logger → delay → route
//! ```

pub mod cors;
pub mod delay;
pub mod logger;

pub use cors::cors_middleware;
pub use delay::delay_middleware;
pub use logger::request_logger;
