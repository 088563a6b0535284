//! Constraint naming.
//!
//! Jet constraint names are global to the database file, so two tables that each
//! reference the same principal would otherwise collide on `FK_<table>_<principal>`.

use std::sync::OnceLock;

use jetmodel_core::JetConfig;
use rand::Rng;
use regex::Regex;

/// Longest identifier Jet accepts.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Exclusive upper bound of the random suffix.
const SUFFIX_RANGE: u32 = 1_000_000;

fn invalid_chars() -> Option<&'static Regex> {
    static INVALID: OnceLock<Option<Regex>> = OnceLock::new();
    INVALID
        .get_or_init(|| match Regex::new(r"[^A-Za-z0-9_]") {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(error = %e, "Identifier pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Replace every character Jet would need brackets for with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    match invalid_chars() {
        Some(regex) => regex.replace_all(name, "_").into_owned(),
        None => name.to_string(),
    }
}

/// Name for the foreign key from `dependent` to `principal`.
///
/// With `append_random_number_for_foreign_key_names` set, a random `_<n>` suffix
/// is appended. The result is at most [`MAX_IDENTIFIER_LEN`] characters.
pub fn foreign_key_name(dependent: &str, principal: &str, config: &JetConfig) -> String {
    let mut base = sanitize_identifier(&format!("FK_{dependent}_{principal}"));

    let suffix = if config.append_random_number_for_foreign_key_names {
        let n = rand::thread_rng().gen_range(0..SUFFIX_RANGE);
        format!("_{n}")
    } else {
        String::new()
    };

    // Sanitized names are ASCII, so byte truncation is safe.
    let room = MAX_IDENTIFIER_LEN - suffix.len();
    if base.len() > room {
        tracing::debug!(name = %base, max = room, "Truncating foreign key name");
        base.truncate(room);
    }
    base.push_str(&suffix);
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Order Details"), "Order_Details");
        assert_eq!(sanitize_identifier("dbo.Students"), "dbo_Students");
        assert_eq!(sanitize_identifier("Ünits"), "_nits");
        assert_eq!(sanitize_identifier("plain_name1"), "plain_name1");
    }

    #[test]
    fn test_foreign_key_name_without_suffix() {
        let config = JetConfig::default().append_random_number_for_foreign_key_names(false);
        assert_eq!(
            foreign_key_name("Enrollments", "Students", &config),
            "FK_Enrollments_Students"
        );
        assert_eq!(
            foreign_key_name("Order Details", "Orders", &config),
            "FK_Order_Details_Orders"
        );
    }

    #[test]
    fn test_foreign_key_name_with_suffix() {
        let config = JetConfig::default();
        let name = foreign_key_name("Enrollments", "Students", &config);
        let suffix = name
            .strip_prefix("FK_Enrollments_Students_")
            .expect("random suffix");
        let n: u32 = suffix.parse().expect("numeric suffix");
        assert!(n < SUFFIX_RANGE);
    }

    #[test]
    fn test_foreign_key_name_respects_length_limit() {
        let long = "T".repeat(80);
        let plain = JetConfig::default().append_random_number_for_foreign_key_names(false);
        assert_eq!(foreign_key_name(&long, "P", &plain).len(), MAX_IDENTIFIER_LEN);

        let suffixed = JetConfig::default();
        let name = foreign_key_name(&long, "P", &suffixed);
        assert!(name.len() <= MAX_IDENTIFIER_LEN);
        assert!(name.starts_with("FK_TTT"));
        assert!(name.rsplit('_').next().is_some_and(|n| n.parse::<u32>().is_ok()));
    }
}
