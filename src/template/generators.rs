//! Value generators for parsed directives.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use serde_json::Value;
use uuid::Uuid;

use crate::config::GenerationConfig;
use crate::template::directive::{Directive, MAX_DATE_SPAN_DAYS, MAX_LOREM_WORDS};
use crate::template::lorem;

/// Most values a single `array` directive may produce, nesting included.
pub const MAX_GENERATED_ELEMENTS: usize = 100_000;

/// Produces synthetic values for directives using the configured defaults.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GenerationConfig,
}

impl Generator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate one value for `directive`.
    ///
    /// Returns `None` when the value cannot be produced: a date outside the
    /// representable range, or an array larger than [`MAX_GENERATED_ELEMENTS`].
    pub fn generate(&self, directive: &Directive) -> Option<Value> {
        if self.element_count(directive) > MAX_GENERATED_ELEMENTS {
            return None;
        }
        let mut rng = rand::thread_rng();
        self.generate_with(&mut rng, directive)
    }

    fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, directive: &Directive) -> Option<Value> {
        let value = match directive {
            Directive::Uuid => Value::String(Uuid::new_v4().to_string()),
            Directive::Boolean => Value::Bool(rng.gen_bool(0.5)),
            Directive::Lorem { min, max } => {
                let (min, max) = self.lorem_bounds(*min, *max);
                let count = rng.gen_range(min..=max) as usize;
                Value::String(lorem::sentence(rng, count))
            }
            Directive::Number { min, max } => {
                let (min, max) = self.number_bounds(*min, *max);
                Value::from(rng.gen_range(min..=max))
            }
            Directive::Past { days } => {
                let offset = self.date_offset(rng, *days);
                timestamp(Utc::now().checked_sub_signed(offset)?)
            }
            Directive::Future { days } => {
                let offset = self.date_offset(rng, *days);
                timestamp(Utc::now().checked_add_signed(offset)?)
            }
            Directive::Array(inner) => Value::Array(
                (0..self.config.array_length)
                    .map(|_| self.generate_with(rng, inner))
                    .collect::<Option<Vec<_>>>()?,
            ),
        };
        Some(value)
    }

    /// Values produced by `directive`, saturating on overflow.
    fn element_count(&self, directive: &Directive) -> usize {
        let depth = u32::try_from(directive.array_depth()).unwrap_or(u32::MAX);
        self.config.array_length.saturating_pow(depth)
    }

    /// Word-count range. A lone `min` widens to the configured maximum.
    fn lorem_bounds(&self, min: Option<u32>, max: Option<u32>) -> (u32, u32) {
        let default_max = self.config.lorem_max_words.min(MAX_LOREM_WORDS);
        match (min, max) {
            (None, _) => ordered(self.config.lorem_min_words.min(default_max), default_max),
            (Some(min), None) => (min, min.max(default_max)),
            (Some(min), Some(max)) => ordered(min, max),
        }
    }

    /// Integer range. A lone `min` widens to the configured maximum.
    fn number_bounds(&self, min: Option<i64>, max: Option<i64>) -> (i64, i64) {
        match (min, max) {
            (None, _) => ordered(self.config.number_min, self.config.number_max),
            (Some(min), None) => (min, min.max(self.config.number_max)),
            (Some(min), Some(max)) => ordered(min, max),
        }
    }

    /// Random offset in `[1s, days]`, so the result is never exactly now.
    fn date_offset<R: Rng + ?Sized>(&self, rng: &mut R, days: Option<u32>) -> Duration {
        let days = days
            .unwrap_or(self.config.date_span_days)
            .clamp(1, MAX_DATE_SPAN_DAYS);
        let span_secs = i64::from(days) * 24 * 60 * 60;
        Duration::seconds(rng.gen_range(1..=span_secs))
    }
}

fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
