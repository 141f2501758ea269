//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Matched Route + RequestContext
//!     → dispatcher.rs (baseline copy or dynamic call)
//!     → query pipeline (static routes only)
//!     → status.rs (method → default status)
//!     → DispatchOutcome { status, body }
//!
//! On failure:
//!     → error.rs (NotFound → 404, everything else → 500)
//!     → reporter.rs (invalid config and internal errors only)
//! ```

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod reporter;
pub mod status;

pub use context::RequestContext;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{BoxError, DispatchError, DispatchResult};
pub use reporter::{Reporter, TracingReporter};
pub use status::determine_status;
