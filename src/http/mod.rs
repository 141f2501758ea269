//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one handler per registered route)
//!     → middleware/ (request id, CORS, logging, delay)
//!     → request.rs (build RequestContext)
//!     → dispatcher
//!     → response.rs (status + JSON body)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::MockServer;
