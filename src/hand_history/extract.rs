//! Lenient named-group extraction combinators.
//!
//! Every hand field is one application of a combinator in this module: a
//! compiled pattern with named capture groups, a source segment, and an
//! aggregation mode. Coercion failure is never an error; the raw captured
//! text is kept instead, since field formats vary slightly across
//! hand-history producers and one malformed field must not abort the rest of
//! the hand.

use std::collections::HashMap;
use std::ops::Add;

use regex::Regex;

/// One captured value after lenient coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured<T> {
    /// The group matched and coerced cleanly.
    Value(T),
    /// The group matched but would not coerce; the raw text is kept.
    Raw(String),
    /// The group is optional and did not take part in the match.
    Absent,
}

impl<T> Captured<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Captured::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Captured::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Captured::Raw(s) => Some(s),
            _ => None,
        }
    }
}

fn coerce_match<T, F>(m: Option<regex::Match<'_>>, coerce: &F) -> Captured<T>
where
    F: Fn(&str) -> Option<T>,
{
    match m {
        None => Captured::Absent,
        Some(m) => match coerce(m.as_str()) {
            Some(v) => Captured::Value(v),
            None => Captured::Raw(m.as_str().to_string()),
        },
    }
}

/// Scalar-first mode: the named group of the first match.
///
/// Returns `None` when the pattern never matches; the caller supplies the
/// field's documented default.
pub fn first<T, F>(re: &Regex, text: &str, group: &str, coerce: F) -> Option<Captured<T>>
where
    F: Fn(&str) -> Option<T>,
{
    re.captures(text)
        .map(|caps| coerce_match(caps.name(group), &coerce))
}

/// List mode: the named group of every match, in order of appearance.
pub fn all<T, F>(re: &Regex, text: &str, group: &str, coerce: F) -> Vec<Captured<T>>
where
    F: Fn(&str) -> Option<T>,
{
    re.captures_iter(text)
        .map(|caps| coerce_match(caps.name(group), &coerce))
        .collect()
}

/// Keyed mode with additive accumulation: repeated keys add their values.
///
/// Supports fields like "total posted amount across multiple posting events".
/// A repeat that did not coerce replaces the accumulated entry rather than
/// poisoning it, mirroring the leniency of the scalar modes.
pub fn keyed_sum<T, F>(
    re: &Regex,
    text: &str,
    key_group: &str,
    value_group: &str,
    coerce: F,
) -> HashMap<String, Captured<T>>
where
    T: Add<Output = T>,
    F: Fn(&str) -> Option<T>,
{
    let mut res: HashMap<String, Captured<T>> = HashMap::new();
    for caps in re.captures_iter(text) {
        let Some(key) = caps.name(key_group) else {
            continue;
        };
        let value = coerce_match(caps.name(value_group), &coerce);
        match (res.remove(key.as_str()), value) {
            (Some(Captured::Value(a)), Captured::Value(b)) => {
                res.insert(key.as_str().to_string(), Captured::Value(a + b));
            }
            (_, value) => {
                res.insert(key.as_str().to_string(), value);
            }
        }
    }
    res
}

/// Keyed mode with sequence accumulation: repeated keys collect every value.
///
/// Supports fields like "all of a player's actions on a street".
pub fn keyed_list<T, F>(
    re: &Regex,
    text: &str,
    key_group: &str,
    value_group: &str,
    coerce: F,
) -> HashMap<String, Vec<Captured<T>>>
where
    F: Fn(&str) -> Option<T>,
{
    let mut res: HashMap<String, Vec<Captured<T>>> = HashMap::new();
    for caps in re.captures_iter(text) {
        let Some(key) = caps.name(key_group) else {
            continue;
        };
        let value = coerce_match(caps.name(value_group), &coerce);
        res.entry(key.as_str().to_string()).or_default().push(value);
    }
    res
}

/// Identity coercion for fields that stay textual.
pub fn as_text(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// Chip-count coercion: plain digits, optionally comma grouped.
pub fn as_chips(s: &str) -> Option<u64> {
    s.replace(',', "").parse().ok()
}
