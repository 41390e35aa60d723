//! Natural ordering over free-text identifier fields.
//!
//! Storage engines sort text lexicographically, which puts "Rack 10"
//! before "Rack 2". Natural ordering segments a value into three parts —
//! leading integer, middle, trailing integer — and compares the integer
//! parts by numeric value. The keys are derived in-language so every
//! engine produces the same ordering.

use std::cmp::Ordering;

/// Maximum digits contributing to a numeric key. The full digit run is
/// still stripped from the middle part.
const MAX_KEY_DIGITS: usize = 9;

/// Three-part sort key derived from a text field.
///
/// The derived `Ord` compares `leading`, `middle`, `trailing` in that
/// order; `Option`'s ordering makes absent integer parts sort before
/// present ones, so non-numeric values come first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalSortKey {
    pub leading: Option<u32>,
    pub middle: String,
    pub trailing: Option<u32>,
}

/// Derives the three-part key for `text`.
///
/// The leading and trailing ASCII-digit runs are extracted
/// independently; an all-digit value yields the same leading and
/// trailing key and an empty middle.
pub fn natural_key(text: &str) -> NaturalSortKey {
    let bytes = text.as_bytes();
    let lead_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let trail_len = bytes.iter().rev().take_while(|b| b.is_ascii_digit()).count();

    let leading = (lead_len > 0).then(|| digits_value(&text[..lead_len.min(MAX_KEY_DIGITS)]));
    let trailing = (trail_len > 0).then(|| {
        let run = &text[bytes.len() - trail_len..];
        digits_value(&run[run.len() - trail_len.min(MAX_KEY_DIGITS)..])
    });
    let middle = if lead_len == bytes.len() {
        String::new()
    } else {
        text[lead_len..bytes.len() - trail_len].to_string()
    };

    NaturalSortKey {
        leading,
        middle,
        trailing,
    }
}

/// Total, idempotent comparison of two values under natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Stable in-place natural sort of `items` by the text `key` extracts.
pub fn natural_sort_by<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}

// At most MAX_KEY_DIGITS ASCII digits, so this cannot overflow u32.
fn digits_value(run: &str) -> u32 {
    run.bytes().fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
}
