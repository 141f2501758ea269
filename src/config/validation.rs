//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{MockConfig, RouteConfig, TransformAction};
use crate::template::{MAX_DATE_SPAN_DAYS, MAX_LOREM_WORDS};

/// Upper bound on `generation.array_length`.
pub const MAX_ARRAY_LENGTH: usize = 10_000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("unknown log level '{0}'")]
    LogLevel(String),

    #[error("generation.array_length {0} exceeds {MAX_ARRAY_LENGTH}")]
    ArrayLength(usize),

    #[error("generation.{field} {value} is outside 1..={max}")]
    OutOfRange { field: &'static str, value: u32, max: u32 },

    #[error("generation.{field}: min {min} is greater than max {max}")]
    Bounds { field: &'static str, min: i64, max: i64 },

    #[error("route {index}: {reason}")]
    Route { index: usize, reason: String },
}

/// Validate a loaded configuration, including its inline routes.
pub fn validate_config(config: &MockConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }

    let generation = &config.generation;
    if generation.array_length > MAX_ARRAY_LENGTH {
        errors.push(ValidationError::ArrayLength(generation.array_length));
    }
    if !(1..=MAX_DATE_SPAN_DAYS).contains(&generation.date_span_days) {
        errors.push(ValidationError::OutOfRange {
            field: "date_span_days",
            value: generation.date_span_days,
            max: MAX_DATE_SPAN_DAYS,
        });
    }
    if !(1..=MAX_LOREM_WORDS).contains(&generation.lorem_max_words) {
        errors.push(ValidationError::OutOfRange {
            field: "lorem_max_words",
            value: generation.lorem_max_words,
            max: MAX_LOREM_WORDS,
        });
    }
    if generation.lorem_min_words > generation.lorem_max_words {
        errors.push(ValidationError::Bounds {
            field: "lorem_min_words",
            min: generation.lorem_min_words.into(),
            max: generation.lorem_max_words.into(),
        });
    }
    if generation.number_min > generation.number_max {
        errors.push(ValidationError::Bounds {
            field: "number_min",
            min: generation.number_min,
            max: generation.number_max,
        });
    }

    if let Err(route_errors) = validate_routes(&config.routes) {
        errors.extend(route_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate config-declared routes. Response shapes are checked by the registry.
pub fn validate_routes(routes: &[RouteConfig]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |index: usize, reason: String| errors.push(ValidationError::Route { index, reason });

    for (index, route) in routes.iter().enumerate() {
        if route.path.trim().is_empty() {
            fail(index, "path must not be empty".to_string());
        } else if !route.path.starts_with('/') {
            fail(index, format!("path '{}' must start with '/'", route.path));
        }

        for transform in &route.query {
            if transform.name.trim().is_empty() {
                fail(index, "query transform name must not be empty".to_string());
            }
            match transform.action {
                TransformAction::Filter if transform.key.as_deref().map_or(true, str::is_empty) => {
                    fail(index, format!("filter '{}' needs a key", transform.name));
                }
                TransformAction::Set if transform.target.is_empty() => {
                    fail(index, format!("set '{}' needs a target", transform.name));
                }
                _ => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
