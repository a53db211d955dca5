use crate::errors::{FxLibError, FxLibResult};
use crate::table::KnownFrameworkReferenceTable;
use crate::target_framework::TargetFramework;
use crate::version::FxVersion;
use log::debug;
use std::collections::BTreeSet;

/// Checks that a requested target platform version is one the table knows
/// about. Unlike framework matching this is an exact comparison: a platform
/// version with no row at all would otherwise resolve to nothing.
#[derive(Debug, Clone, Copy)]
pub struct PlatformVersionValidator<'a> {
    table: &'a KnownFrameworkReferenceTable,
}

impl<'a> PlatformVersionValidator<'a> {
    pub fn new(table: &'a KnownFrameworkReferenceTable) -> Self {
        PlatformVersionValidator { table }
    }

    /// Validates against the platform versions of every row, whatever its name.
    pub fn validate(&self, requested: &str) -> FxLibResult<()> {
        check(requested, self.table.platform_versions())
    }

    /// Validates against rows for one platform only (e.g. "windows").
    pub fn validate_for_platform(&self, platform_identifier: &str, requested: &str) -> FxLibResult<()> {
        check(requested, self.table.platform_versions_for(platform_identifier))
    }

    /// Nothing to check for frameworks without a platform version.
    pub fn validate_target_framework(&self, target_framework: &TargetFramework) -> FxLibResult<()> {
        match (target_framework.platform_identifier(), target_framework.platform_version()) {
            (Some(id), Some(version)) => self.validate_for_platform(id, &version.to_string()),
            _ => Ok(()),
        }
    }
}

fn check(requested: &str, supported: BTreeSet<FxVersion>) -> FxLibResult<()> {
    let unsupported = || FxLibError::UnsupportedPlatformVersion {
        requested: requested.trim().to_owned(),
        supported: supported.iter().map(|v| v.to_string()).collect(),
    };

    let version = FxVersion::parse(requested).map_err(|_| unsupported())?;
    if supported.contains(&version) {
        debug!("Target platform version {} is supported", version);
        Ok(())
    } else {
        Err(unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::raw_row;

    fn table() -> KnownFrameworkReferenceTable {
        KnownFrameworkReferenceTable::from_raw(&[
            raw_row("Microsoft.Windows.SDK.NET.Ref", "net5.0-windows10.0.17760"),
            raw_row("Microsoft.Windows.SDK.NET.Ref", "net5.0-windows10.0.18362"),
            raw_row("Other", "net5.0-android30.0"),
            raw_row("Microsoft.NETCore.App", "net5.0"),
        ]).unwrap()
    }

    #[test]
    pub fn known_version_is_accepted() {
        let t = table();
        let validator = PlatformVersionValidator::new(&t);
        assert!(validator.validate("10.0.18362").is_ok());
        assert!(validator.validate("10.0.18362.0").is_ok());
        assert!(validator.validate("30.0").is_ok());
    }

    #[test]
    pub fn unknown_version_lists_supported_versions() {
        let t = table();
        let validator = PlatformVersionValidator::new(&t);
        match validator.validate_for_platform("windows", "10.0.9999") {
            Err(FxLibError::UnsupportedPlatformVersion { requested, supported }) => {
                assert_eq!(requested, "10.0.9999");
                assert_eq!(supported, vec!["10.0.17760", "10.0.18362"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn no_less_than_or_equal_fuzziness() {
        let t = table();
        let validator = PlatformVersionValidator::new(&t);
        assert!(validator.validate("10.0.19041").is_err());
        assert!(validator.validate("10.0.18000").is_err());
        assert!(validator.validate("not a version").is_err());
    }

    #[test]
    pub fn validate_for_platform_ignores_other_platforms() {
        let t = table();
        let validator = PlatformVersionValidator::new(&t);
        assert!(validator.validate_for_platform("windows", "30.0").is_err());
        assert!(validator.validate_for_platform("android", "30.0").is_ok());
    }

    #[test]
    pub fn validate_target_framework_skips_unversioned_platforms() {
        let t = table();
        let validator = PlatformVersionValidator::new(&t);
        let tf = |s: &str| TargetFramework::parse(s).unwrap();
        assert!(validator.validate_target_framework(&tf("net5.0")).is_ok());
        assert!(validator.validate_target_framework(&tf("net5.0-windows")).is_ok());
        assert!(validator.validate_target_framework(&tf("net5.0-windows10.0.17760")).is_ok());
        assert!(validator.validate_target_framework(&tf("net5.0-windows10.0.9999")).is_err());
    }
}
