//! Raw name cleanup applied before decomposition.

/// Strips trailing dots, asterisks and whitespace, then leading and
/// trailing dashes and whitespace.
///
/// ```
/// use medname_parser::clean_name;
///
/// assert_eq!(clean_name("- BETASERC 16 MG 30 TB ***. "), "BETASERC 16 MG 30 TB");
/// ```
pub fn clean_name(raw: &str) -> &str {
    raw.trim_end_matches(|c: char| c == '.' || c == '*' || c.is_whitespace())
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
}
