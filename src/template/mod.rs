//! Template resolution subsystem.
//!
//! # Data Flow
//! ```text
//! TemplateValue (serde_json::Value)
//!     → resolver.rs (walk objects/arrays)
//!     → directive.rs (parse "category.arg1.arg2" strings)
//!     → generators.rs (uuid, lorem, number, boolean, past, future, array)
//!     → concrete Value
//! ```
//!
//! # Design Decisions
//! - Every string in a generated template is a directive
//! - Unknown directives become `Invalid key: <directive>`, never an error
//! - Generation defaults come from `GenerationConfig`

pub mod directive;
pub mod generators;
pub mod lorem;
pub mod resolver;

pub use directive::{Directive, MAX_ARRAY_DEPTH, MAX_DATE_SPAN_DAYS, MAX_LOREM_WORDS};
pub use generators::{Generator, MAX_GENERATED_ELEMENTS};
pub use resolver::{TemplateResolver, INVALID_KEY_PREFIX};
