//! Dependency spec strings.
//!
//! A spec is `<name>` optionally followed by a version constraint
//! (`widget^1.2.0`, `widget >=1.0`) or an explicit ref pin (`widget@main`).

/// Constraint operator tokens, longest-prefix variants first so that `>=`
/// wins over `>` when both start at the same index.
pub const OPERATORS: [&str; 7] = ["==", ">=", "<=", "^", "~", ">", "<"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: String,
    /// Trimmed constraint text starting at the first operator, space, or `@`.
    /// `None` when the spec is a bare package name.
    pub constraint: Option<String>,
}

/// Split a raw spec at the leftmost occurrence of any constraint operator,
/// space, or `@`. Ties at the same index go to the earlier candidate token.
pub fn split(raw: &str) -> DependencySpec {
    let mut split_at: Option<usize> = None;
    for token in OPERATORS.iter().copied().chain([" ", "@"]) {
        if let Some(position) = raw.find(token)
            && split_at.is_none_or(|best| position < best)
        {
            split_at = Some(position);
        }
    }

    match split_at {
        Some(position) => {
            let constraint = raw[position..].trim();
            DependencySpec {
                name: raw[..position].trim().to_string(),
                constraint: (!constraint.is_empty()).then(|| constraint.to_string()),
            }
        }
        None => DependencySpec {
            name: raw.trim().to_string(),
            constraint: None,
        },
    }
}
