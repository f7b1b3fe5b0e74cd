//! Key redemption: classify an inbound text and consume the key if it is valid.

use std::sync::OnceLock;

use regex::Regex;

use crate::{catalog::KeyCatalog, domain::Key};

/// How a key submission was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redemption {
    /// Not a plain non-negative integer.
    NotNumeric,
    /// Numeric, but not (or no longer) in the catalog.
    Rejected,
    /// Key was present and has now been consumed.
    Redeemed(Key),
}

fn key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("static key regex is valid"))
}

/// A submitted key after syntactic validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    /// Not a digit string.
    Invalid,
    /// A digit string too large to be any key.
    OutOfRange,
    Key(Key),
}

/// Parse a submitted key, ignoring surrounding whitespace.
pub fn parse_key(text: &str) -> KeyInput {
    let text = text.trim();
    if !key_pattern().is_match(text) {
        return KeyInput::Invalid;
    }
    match text.parse::<Key>() {
        Ok(key) => KeyInput::Key(key),
        Err(_) => KeyInput::OutOfRange,
    }
}

/// Classify `text` and, if it names a live key, remove it from `catalog`.
pub async fn redeem(catalog: &KeyCatalog, text: &str) -> Redemption {
    match parse_key(text) {
        KeyInput::Invalid => Redemption::NotNumeric,
        KeyInput::OutOfRange => Redemption::Rejected,
        KeyInput::Key(key) => {
            if catalog.redeem(key).await {
                Redemption::Redeemed(key)
            } else {
                Redemption::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn parse_accepts_digits_with_surrounding_whitespace() {
        assert_eq!(parse_key("1001"), KeyInput::Key(1001));
        assert_eq!(parse_key("  2002\n"), KeyInput::Key(2002));
        assert_eq!(parse_key("007"), KeyInput::Key(7));
    }

    #[test]
    fn parse_rejects_non_digit_strings() {
        for s in ["abc", "12.5", "-7", "+7", "", "   ", "12 34", "1e3", "٣"] {
            assert_eq!(parse_key(s), KeyInput::Invalid, "accepted {s:?}");
        }
    }

    #[test]
    fn parse_overflow_is_not_a_key() {
        assert_eq!(parse_key("99999999999999999999999"), KeyInput::OutOfRange);
    }

    #[tokio::test]
    async fn non_numeric_leaves_catalog_unchanged() {
        let catalog = KeyCatalog::new([1001, 2002]);
        for s in ["abc", "12.5", "-7"] {
            assert_eq!(redeem(&catalog, s).await, Redemption::NotNumeric);
        }
        assert_eq!(catalog.snapshot().await, HashSet::from([1001, 2002]));
    }

    #[tokio::test]
    async fn second_redemption_is_rejected() {
        let catalog = KeyCatalog::new([1001, 2002]);
        assert_eq!(redeem(&catalog, "1001").await, Redemption::Redeemed(1001));
        assert_eq!(redeem(&catalog, "1001").await, Redemption::Rejected);
        assert_eq!(catalog.snapshot().await, HashSet::from([2002]));
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let catalog = KeyCatalog::new([1001]);
        assert_eq!(redeem(&catalog, "5555").await, Redemption::Rejected);
        assert_eq!(
            redeem(&catalog, "99999999999999999999999").await,
            Redemption::Rejected
        );
        assert_eq!(catalog.remaining().await, 1);
    }
}
