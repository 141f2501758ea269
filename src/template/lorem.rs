//! Lorem ipsum text.

use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "eu", "fugiat", "nulla",
    "pariatur", "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt",
    "culpa", "qui", "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

/// A capitalised sentence of exactly `count` words ending in a period.
/// Returns an empty string for `count == 0`.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    let mut text = (0..count)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ");

    let capital = text.get(0..1).map(str::to_ascii_uppercase);
    if let Some(upper) = capital {
        text.replace_range(0..1, &upper);
        text.push('.');
    }
    text
}
