//! Run-time support for generated enumerations: the companion matcher and
//! the codec adapters generated impls delegate to.

pub mod codec;

use std::fmt;

/// Implemented by every generated enumeration.
pub trait Enumeration: Copy + Eq + fmt::Debug + 'static {
    /// The identifier name of this value.
    fn identifier(&self) -> &'static str;
    /// The canonical wire form of this value.
    fn serialized(&self) -> &'static str;
    /// Every text this value matches at parse time: the serialized form,
    /// the identifier, and the declared parse-from entries.
    fn aliases(&self) -> &'static [&'static str];
}

/// Parse failure: the text matched no candidate. Carries the offending
/// text and the serialized form of every candidate for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{text}' is not one of: {}", .valid.join(", "))]
pub struct UnrecognizedValue {
    pub text: String,
    pub valid: Vec<String>,
}

impl UnrecognizedValue {
    pub fn new<E: Enumeration>(text: &str, candidates: &[E]) -> Self {
        Self {
            text: text.to_string(),
            valid: candidates
                .iter()
                .map(|candidate| candidate.serialized().to_string())
                .collect(),
        }
    }
}

/// Matcher over an enumeration's declared values.
///
/// Built once at startup, immutable afterwards; concurrent readers need no
/// synchronization. Matching is case-insensitive across each candidate's
/// alias set, and candidates are scanned in declaration order, so the first
/// declared match wins.
#[derive(Debug, Clone)]
pub struct Companion<E: Enumeration> {
    universe: Vec<E>,
}

impl<E: Enumeration> Companion<E> {
    pub fn new(universe: Vec<E>) -> Self {
        Self { universe }
    }

    /// All declared values, in declaration order.
    pub fn values(&self) -> &[E] {
        &self.universe
    }

    /// Match `text` against the given candidates, case-insensitively.
    pub fn parse_from(&self, text: &str, candidates: &[E]) -> Result<E, UnrecognizedValue> {
        let needle = text.to_lowercase();

        for candidate in candidates {
            if candidate
                .aliases()
                .iter()
                .any(|alias| alias.to_lowercase() == needle)
            {
                return Ok(*candidate);
            }
        }

        Err(UnrecognizedValue::new(text, candidates))
    }

    /// Match `text` against every declared value.
    pub fn parse(&self, text: &str) -> Result<E, UnrecognizedValue> {
        self.parse_from(text, &self.universe)
    }

    pub fn is_from(&self, text: &str, candidates: &[E]) -> bool {
        self.parse_from(text, candidates).is_ok()
    }

    pub fn is(&self, text: &str) -> bool {
        self.is_from(text, &self.universe)
    }
}
