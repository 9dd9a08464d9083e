//! Address fragments value object
//!
//! Normalized tokens of a reverse-geocoded address, used as the matching key
//! against a record's service-area cities.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalize a single token for case-insensitive exact comparison
///
/// Commas are removed, surrounding whitespace trimmed, and the result lower-cased.
#[must_use]
pub fn normalize_token(raw: &str) -> String {
    raw.replace(',', "").trim().to_lowercase()
}

/// Ordered, lower-cased tokens derived from a formatted address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFragments(Vec<String>);

impl AddressFragments {
    /// Tokenize a formatted address string
    ///
    /// Commas are stripped before splitting on whitespace, so tokens never
    /// contain commas. Empty tokens are dropped; original order is kept.
    #[must_use]
    pub fn from_formatted_address(address: &str) -> Self {
        let tokens = address
            .replace(',', " ")
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        Self(tokens)
    }

    /// Build fragments from already-split tokens, normalizing each one
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tokens
                .into_iter()
                .map(|t| normalize_token(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// The tokens in address order
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Number of tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tokens at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the given token is present (exact, case-insensitive)
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        let needle = normalize_token(token);
        !needle.is_empty() && self.0.iter().any(|t| *t == needle)
    }

    /// Whether at least one token equals one of the given normalized city names
    #[must_use]
    pub fn shares_token_with(&self, cities: &BTreeSet<String>) -> bool {
        self.0.iter().any(|t| cities.contains(t))
    }
}

impl fmt::Display for AddressFragments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_formatted_address() {
        let fragments =
            AddressFragments::from_formatted_address("MG Road, Kochi, Ernakulam, Kerala 682016");
        assert_eq!(
            fragments.tokens(),
            ["mg", "road", "kochi", "ernakulam", "kerala", "682016"]
        );
    }

    #[test]
    fn commas_never_survive_tokenization() {
        let fragments = AddressFragments::from_formatted_address("Kochi,,Ernakulam ,Kerala,");
        assert_eq!(fragments.tokens(), ["kochi", "ernakulam", "kerala"]);
        assert!(fragments.tokens().iter().all(|t| !t.contains(',')));
    }

    #[test]
    fn empty_address_yields_no_tokens() {
        assert!(AddressFragments::from_formatted_address("").is_empty());
        assert!(AddressFragments::from_formatted_address(" , ,").is_empty());
    }

    #[test]
    fn from_tokens_normalizes() {
        let fragments = AddressFragments::from_tokens(["  Kochi ", "ERNAKULAM,", ""]);
        assert_eq!(fragments.tokens(), ["kochi", "ernakulam"]);
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn contains_is_exact_and_case_insensitive() {
        let fragments = AddressFragments::from_tokens(["kochi", "kerala"]);
        assert!(fragments.contains("Kochi"));
        assert!(fragments.contains(" KERALA "));
        assert!(!fragments.contains("koch"));
        assert!(!fragments.contains(""));
    }

    #[test]
    fn shares_token_with_city_set() {
        let fragments = AddressFragments::from_tokens(["kochi", "ernakulam", "kerala"]);
        let hit: BTreeSet<String> = ["thrissur", "kochi"].iter().map(|s| (*s).to_string()).collect();
        let miss: BTreeSet<String> = ["kottayam"].iter().map(|s| (*s).to_string()).collect();
        assert!(fragments.shares_token_with(&hit));
        assert!(!fragments.shares_token_with(&miss));
        assert!(!fragments.shares_token_with(&BTreeSet::new()));
    }

    #[test]
    fn normalize_token_strips_commas() {
        assert_eq!(normalize_token(" Kochi, "), "kochi");
    }
}
