use semver::Version;

/// Strip surrounding whitespace and a leading `v`/`V` from a tag-style version.
///
/// Examples:
/// - "v1.2.0" -> "1.2.0"
/// - " V2 " -> "2"
pub fn normalize_version(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
/// Does NOT strip 'v' prefix (use `normalize_version` first if needed).
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("v1.2.0", "1.2.0")]
    #[case("V1.2.0", "1.2.0")]
    #[case(" 1.2.0 ", "1.2.0")]
    #[case("1.2.0", "1.2.0")]
    fn normalize_version_strips_prefix(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_version(input), expected);
    }

    #[rstest]
    #[case("1", Some(Version::new(1, 0, 0)))]
    #[case("1.2", Some(Version::new(1, 2, 0)))]
    #[case("1.2.3", Some(Version::new(1, 2, 3)))]
    #[case("main", None)]
    #[case("", None)]
    fn parse_version_pads_partial_versions(#[case] input: &str, #[case] expected: Option<Version>) {
        assert_eq!(parse_version(input), expected);
    }
}
