//! Tag parsing and best-version selection.

use semver::{Version, VersionReq};

use crate::error::AtofetchError;
use crate::report::Reporter;

/// Constraint used when the user gave none: anything matches.
pub const WILDCARD: &str = "*";

/// Parse a repository tag as a semantic version. Release tags conventionally
/// carry a leading `v`, which is accepted and stripped.
pub fn parse_tag(tag: &str) -> Result<Version, semver::Error> {
    let trimmed = tag.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed))
}

fn parse_constraint(constraint: &str) -> Result<VersionReq, AtofetchError> {
    // semver spells exact-match requirements `=`, not `==`.
    let normalized = constraint.trim().replace("==", "=");
    VersionReq::parse(&normalized).map_err(|source| AtofetchError::BadConstraint {
        constraint: constraint.to_string(),
        source,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The user pinned an explicit ref with `@`; version matching is bypassed.
    Pinned(String),
    /// Best tag satisfying the constraint, by version ordering.
    Tag { version: Version, tag: String },
    /// No parseable version tags at all; check out the default branch.
    DefaultBranch,
}

/// Decide what to check out for `constraint` given the repository's tags.
///
/// Tags that are not valid semantic versions are skipped, not fatal. An empty
/// parsed tag set falls back to the default branch with a warning; a parsed
/// tag set where nothing matches the constraint is an error.
pub fn select(
    name: &str,
    constraint: &str,
    tags: &[String],
    reporter: &dyn Reporter,
) -> Result<Selection, AtofetchError> {
    if let Some(position) = constraint.find('@') {
        return Ok(Selection::Pinned(constraint[position + 1..].trim().to_string()));
    }

    let mut parsed: Vec<(Version, &str)> = Vec::new();
    for tag in tags {
        match parse_tag(tag) {
            Ok(version) => parsed.push((version, tag.as_str())),
            Err(_) => reporter.debug(&format!("tag {tag} is not a valid semver tag, skipping")),
        }
    }

    if parsed.is_empty() {
        reporter.warning(&format!(
            "no semver tags found for {name}; using the latest default branch"
        ));
        return Ok(Selection::DefaultBranch);
    }

    let requirement = parse_constraint(constraint)?;
    parsed
        .into_iter()
        .filter(|(version, _)| requirement.matches(version))
        .max_by(|(left, _), (right, _)| left.cmp(right))
        .map(|(version, tag)| Selection::Tag {
            version,
            tag: tag.to_string(),
        })
        .ok_or_else(|| AtofetchError::NoMatchingVersion {
            name: name.to_string(),
            constraint: constraint.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::testing::RecordingReporter;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn parses_tags_with_and_without_v_prefix() {
        assert_eq!(parse_tag("1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse_tag("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert!(parse_tag("release-candidate").is_err());
    }

    #[test]
    fn caret_constraint_selects_max_matching_not_global_max() {
        let reporter = RecordingReporter::default();
        let selection = select(
            "widget",
            "^1.0.0",
            &tags(&["v1.0.0", "v1.2.0", "v2.0.0"]),
            &reporter,
        )
        .unwrap();
        assert_eq!(
            selection,
            Selection::Tag {
                version: Version::new(1, 2, 0),
                tag: "v1.2.0".to_string(),
            }
        );
    }

    #[test]
    fn wildcard_selects_global_max() {
        let reporter = RecordingReporter::default();
        let selection = select(
            "widget",
            WILDCARD,
            &tags(&["v1.0.0", "v2.0.0"]),
            &reporter,
        )
        .unwrap();
        assert_eq!(
            selection,
            Selection::Tag {
                version: Version::new(2, 0, 0),
                tag: "v2.0.0".to_string(),
            }
        );
    }

    #[test]
    fn unparseable_tags_are_skipped_with_a_debug_note() {
        let reporter = RecordingReporter::default();
        let selection = select(
            "widget",
            WILDCARD,
            &tags(&["nightly", "v1.0.0"]),
            &reporter,
        )
        .unwrap();
        assert_eq!(
            selection,
            Selection::Tag {
                version: Version::new(1, 0, 0),
                tag: "v1.0.0".to_string(),
            }
        );
        let debug = reporter.messages("debug");
        assert_eq!(debug.len(), 1);
        assert!(debug[0].contains("nightly"));
    }

    #[test]
    fn zero_valid_tags_falls_back_to_default_branch() {
        let reporter = RecordingReporter::default();
        let selection = select("widget", WILDCARD, &tags(&["nightly"]), &reporter).unwrap();
        assert_eq!(selection, Selection::DefaultBranch);
        assert!(
            reporter.messages("warning")[0].contains("no semver tags found"),
            "expected the fallback warning"
        );
    }

    #[test]
    fn at_pin_bypasses_version_matching() {
        let reporter = RecordingReporter::default();
        let selection = select("widget", "@main", &tags(&["v9.9.9"]), &reporter).unwrap();
        assert_eq!(selection, Selection::Pinned("main".to_string()));
    }

    #[test]
    fn no_matching_tag_is_an_error() {
        let reporter = RecordingReporter::default();
        let err = select("widget", "^3.0.0", &tags(&["v1.0.0", "v2.0.0"]), &reporter)
            .expect_err("nothing satisfies ^3.0.0");
        assert!(matches!(err, AtofetchError::NoMatchingVersion { .. }));
    }

    #[test]
    fn double_equals_is_normalized_to_exact_match() {
        let reporter = RecordingReporter::default();
        let selection = select(
            "widget",
            "==1.0.0",
            &tags(&["v1.0.0", "v1.2.0"]),
            &reporter,
        )
        .unwrap();
        assert_eq!(
            selection,
            Selection::Tag {
                version: Version::new(1, 0, 0),
                tag: "v1.0.0".to_string(),
            }
        );
    }

    #[test]
    fn bad_constraint_is_reported_as_such() {
        let reporter = RecordingReporter::default();
        let err = select("widget", ">=not.a.version", &tags(&["v1.0.0"]), &reporter)
            .expect_err("constraint is garbage");
        assert!(matches!(err, AtofetchError::BadConstraint { .. }));
    }
}
