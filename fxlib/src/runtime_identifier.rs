use serde::{Deserialize, Serialize};

/// The placeholder used in runtime pack name patterns,
/// e.g. `Microsoft.NETCore.App.Runtime.**RID**`.
pub const RUNTIME_IDENTIFIER_PLACEHOLDER: &str = "**RID**";

/// The runtime identifiers a known framework reference has runtime packs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeIdentifierSet {
    /// Runtime packs exist for any runtime identifier.
    Any,
    List(Vec<String>),
}

impl RuntimeIdentifierSet {
    /// Parses the `;` separated metadata value. An empty value, `*` or
    /// `any` mean no restriction.
    pub fn parse(value: &str) -> Self {
        let rids = split_list(value);
        if rids.is_empty() || rids.iter().any(|r| r == "*" || unicase::eq_ascii(r.as_str(), "any")) {
            RuntimeIdentifierSet::Any
        } else {
            RuntimeIdentifierSet::List(rids)
        }
    }

    pub fn supports(&self, runtime_identifier: &str) -> bool {
        match self {
            RuntimeIdentifierSet::Any => true,
            RuntimeIdentifierSet::List(rids) => rids.iter().any(|r| unicase::eq_ascii(r.as_str(), runtime_identifier)),
        }
    }
}

/// What to do with runtime packs of an "any" row when the project has not
/// asked for a particular runtime identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnyRuntimeIdentifierPolicy {
    /// Emit a single runtime pack with the placeholder left in its name and
    /// no runtime identifier; a later build phase binds it.
    Defer,
    /// Expand eagerly against the given identifiers.
    Expand(Vec<String>),
}

impl Default for AnyRuntimeIdentifierPolicy {
    fn default() -> Self {
        AnyRuntimeIdentifierPolicy::Defer
    }
}

pub fn substitute_runtime_identifier(pattern: &str, runtime_identifier: &str) -> String {
    pattern.replace(RUNTIME_IDENTIFIER_PLACEHOLDER, runtime_identifier)
}

/// Splits an MSBuild style `;` separated list, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value.split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn parse_recognises_any() {
        assert_eq!(RuntimeIdentifierSet::parse(""), RuntimeIdentifierSet::Any);
        assert_eq!(RuntimeIdentifierSet::parse("*"), RuntimeIdentifierSet::Any);
        assert_eq!(RuntimeIdentifierSet::parse("Any"), RuntimeIdentifierSet::Any);
        assert_eq!(
            RuntimeIdentifierSet::parse("win-x64; win-x86;;"),
            RuntimeIdentifierSet::List(vec!["win-x64".to_owned(), "win-x86".to_owned()])
        );
    }

    #[test]
    pub fn supports_is_case_insensitive() {
        let set = RuntimeIdentifierSet::parse("win-x64;linux-x64");
        assert!(set.supports("WIN-X64"));
        assert!(!set.supports("osx-x64"));
        assert!(RuntimeIdentifierSet::Any.supports("osx-x64"));
    }

    #[test]
    pub fn substitutes_placeholder() {
        assert_eq!(
            substitute_runtime_identifier("Microsoft.NETCore.App.Runtime.**RID**", "win-x64"),
            "Microsoft.NETCore.App.Runtime.win-x64"
        );
        assert_eq!(substitute_runtime_identifier("NoPlaceholder", "win-x64"), "NoPlaceholder");
    }
}
