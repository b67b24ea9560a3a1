//! Member-name transformation strategies.
//!
//! A mapping directive selects one strategy; the Property Matcher applies it
//! to source member names before comparing against target member names.
//! Comparison is always case-insensitive on the already-transformed name, so
//! `LowerFirst` turns `FirstName` into `firstName` which matches `firstname`
//! but never `first_name` (the separator makes the names differ even
//! case-insensitively).

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// Source names are used as declared.
    #[default]
    Identity,
    /// First letter lowered: `FirstName` -> `firstName`.
    LowerFirst,
    /// Words separated by underscores, lowercased: `FirstName` -> `first_name`.
    Underscore,
    /// Words separated by hyphens, lowercased: `FirstName` -> `first-name`.
    Hyphen,
}

impl NamingStrategy {
    /// Transform a declared member name according to this strategy.
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingStrategy::Identity => name.to_string(),
            NamingStrategy::LowerFirst => lower_first(name),
            NamingStrategy::Underscore => separate_words(name, '_'),
            NamingStrategy::Hyphen => separate_words(name, '-'),
        }
    }

    /// Whether a source member name matches a target member name under this
    /// strategy. The source name is transformed; the target name is compared
    /// as declared, case-insensitively.
    pub fn matches(self, source_name: &str, target_name: &str) -> bool {
        self.apply(source_name).eq_ignore_ascii_case(target_name)
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a camel/pascal-case name at case boundaries and rejoin lowercased.
///
/// Runs of uppercase letters stay together until the last one: `HTTPStatus`
/// becomes `http_status`, not `h_t_t_p_status`.
fn separate_words(name: &str, separator: char) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev_lower = chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit();
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev_lower || (chars[i - 1].is_uppercase() && next_lower) {
                out.push(separator);
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keeps_names() {
        assert_eq!(NamingStrategy::Identity.apply("FirstName"), "FirstName");
        assert!(NamingStrategy::Identity.matches("FirstName", "firstname"));
    }

    #[test]
    fn lower_first_lowers_only_the_first_letter() {
        assert_eq!(NamingStrategy::LowerFirst.apply("FirstName"), "firstName");
        assert_eq!(NamingStrategy::LowerFirst.apply("x"), "x");
        assert_eq!(NamingStrategy::LowerFirst.apply(""), "");
    }

    #[test]
    fn lower_first_matches_camel_but_not_snake() {
        assert!(NamingStrategy::LowerFirst.matches("FirstName", "firstName"));
        assert!(NamingStrategy::LowerFirst.matches("FirstName", "FIRSTNAME"));
        assert!(!NamingStrategy::LowerFirst.matches("FirstName", "first_name"));
    }

    #[test]
    fn underscore_separates_case_boundaries() {
        assert_eq!(NamingStrategy::Underscore.apply("FirstName"), "first_name");
        assert_eq!(NamingStrategy::Underscore.apply("AddressCity"), "address_city");
        assert_eq!(NamingStrategy::Underscore.apply("id"), "id");
    }

    #[test]
    fn underscore_keeps_acronym_runs_together() {
        assert_eq!(NamingStrategy::Underscore.apply("HTTPStatus"), "http_status");
        assert_eq!(NamingStrategy::Underscore.apply("UserID"), "user_id");
    }

    #[test]
    fn hyphen_uses_hyphens() {
        assert_eq!(NamingStrategy::Hyphen.apply("FirstName"), "first-name");
        assert!(NamingStrategy::Hyphen.matches("FirstName", "First-Name"));
    }
}
