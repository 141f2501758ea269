//! Directive grammar.
//!
//! ```text
//! directive := category [ "." arg [ "." arg ] ]
//!            | "array" "." directive
//! category  := uuid | lorem | number | boolean | past | future
//! ```
//!
//! Parsing is total: anything outside the grammar yields `None` and the
//! resolver substitutes the `Invalid key: ...` sentinel. Arguments above
//! [`MAX_LOREM_WORDS`] or [`MAX_DATE_SPAN_DAYS`], and `array` nested deeper
//! than [`MAX_ARRAY_DEPTH`], are outside the grammar.

use std::str::FromStr;

/// Largest word count a `lorem` directive may ask for.
pub const MAX_LOREM_WORDS: u32 = 1_000;

/// Largest window, in days, for `past` and `future` (about 100 years).
pub const MAX_DATE_SPAN_DAYS: u32 = 36_500;

/// Deepest `array.array...` nesting accepted.
pub const MAX_ARRAY_DEPTH: usize = 3;

/// A parsed value-generation directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Random v4 UUID string.
    Uuid,
    /// Lorem ipsum text with a word count in `[min, max]`.
    Lorem { min: Option<u32>, max: Option<u32> },
    /// Uniform integer in `[min, max]`.
    Number { min: Option<i64>, max: Option<i64> },
    /// Random boolean.
    Boolean,
    /// Timestamp before now, at most `days` in the past.
    Past { days: Option<u32> },
    /// Timestamp after now, at most `days` in the future.
    Future { days: Option<u32> },
    /// Sequence whose elements follow the inner directive.
    Array(Box<Directive>),
}

impl Directive {
    /// Parse a directive string. Returns `None` for anything outside the grammar.
    pub fn parse(input: &str) -> Option<Directive> {
        let segments: Vec<&str> = input.split('.').collect();
        parse_segments(&segments, 0)
    }

    /// Number of `array` wrappers around the innermost directive.
    pub fn array_depth(&self) -> usize {
        match self {
            Directive::Array(inner) => 1 + inner.array_depth(),
            _ => 0,
        }
    }
}

fn parse_segments(segments: &[&str], depth: usize) -> Option<Directive> {
    let (category, args) = segments.split_first()?;

    match *category {
        "uuid" if args.is_empty() => Some(Directive::Uuid),
        "boolean" if args.is_empty() => Some(Directive::Boolean),
        "lorem" => {
            let (min, max) = bounds::<u32>(args)?;
            if min.max(max).is_some_and(|words| words > MAX_LOREM_WORDS) {
                return None;
            }
            Some(Directive::Lorem { min, max })
        }
        "number" => {
            let (min, max) = bounds::<i64>(args)?;
            Some(Directive::Number { min, max })
        }
        "past" => Some(Directive::Past { days: days(args)? }),
        "future" => Some(Directive::Future { days: days(args)? }),
        "array" if !args.is_empty() && depth < MAX_ARRAY_DEPTH => {
            parse_segments(args, depth + 1).map(|inner| Directive::Array(Box::new(inner)))
        }
        _ => None,
    }
}

/// Up to two numeric arguments. `Some((None, None))` when there are none.
fn bounds<T: FromStr>(args: &[&str]) -> Option<(Option<T>, Option<T>)> {
    match args {
        [] => Some((None, None)),
        [min] => Some((Some(min.parse().ok()?), None)),
        [min, max] => Some((Some(min.parse().ok()?), Some(max.parse().ok()?))),
        _ => None,
    }
}

fn days(args: &[&str]) -> Option<Option<u32>> {
    match single::<u32>(args)? {
        Some(days) if days > MAX_DATE_SPAN_DAYS => None,
        days => Some(days),
    }
}

fn single<T: FromStr>(args: &[&str]) -> Option<Option<T>> {
    match args {
        [] => Some(None),
        [value] => Some(Some(value.parse().ok()?)),
        _ => None,
    }
}
