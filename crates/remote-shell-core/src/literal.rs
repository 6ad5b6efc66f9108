//! Sentinel and back-reference grammar for prompted literals.

use std::sync::LazyLock;

use regex::Regex;

/// Default answer of every prompt: no value supplied.
pub const NULL: &str = "<NULL>";
/// Omit the field (alias of `<NULL>` inside objects).
pub const SKIP: &str = "<SKIP>";
/// Build a full object for this slot now.
pub const CREATE: &str = "<CREATE>";
/// Build a free-form object for this slot now.
pub const SIMPLE: &str = "<SIMPLE>";

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(\w+)>$").expect("reference pattern is valid"));

/// One prompted answer, classified before any coercion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    NoValue,
    Skip,
    Create,
    Simple,
    /// `<name>`: dereference the container `name`.
    Reference(&'a str),
    Literal(&'a str),
}

impl<'a> Token<'a> {
    /// Classify an answer. Sentinels win over references with the same spelling.
    #[must_use]
    pub fn parse(input: &'a str) -> Self {
        match input.trim() {
            NULL => Self::NoValue,
            SKIP => Self::Skip,
            CREATE => Self::Create,
            SIMPLE => Self::Simple,
            trimmed => REFERENCE
                .captures(trimmed)
                .and_then(|c| c.get(1))
                .map_or(Self::Literal(input), |m| Self::Reference(m.as_str())),
        }
    }

    /// True for `<NULL>` and `<SKIP>`.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::NoValue | Self::Skip)
    }
}
