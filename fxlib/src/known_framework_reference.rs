use crate::errors::{FxLibError, FxLibResult};
use crate::runtime_identifier::{split_list, RuntimeIdentifierSet};
use crate::target_framework::TargetFramework;
use crate::version::FxVersion;
use serde::{Deserialize, Serialize};

/// A known framework reference exactly as the host supplies it: an item
/// name plus string metadata.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawKnownFrameworkReference {
    pub include: String,
    pub target_framework: String,
    pub profile: String,
    pub runtime_framework_name: String,
    pub default_runtime_framework_version: String,
    pub latest_runtime_framework_version: String,
    pub targeting_pack_name: String,
    pub targeting_pack_version: String,
    pub runtime_pack_name_patterns: String,
    pub runtime_pack_runtime_identifiers: String,
    pub runtime_copy_local: String,
    pub runtime_pack_always_copy_local: String,
    pub is_windows_only: String,
    pub package_conflict_preferred_packages: String,
}

/// One validated row of the known framework reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownFrameworkReference {
    pub name: String,
    pub target_framework: TargetFramework,
    pub runtime_framework_name: String,
    pub default_runtime_framework_version: FxVersion,
    pub latest_runtime_framework_version: FxVersion,
    pub targeting_pack_name: String,
    pub targeting_pack_version: FxVersion,
    pub runtime_pack_name_patterns: Vec<String>,
    pub runtime_pack_runtime_identifiers: RuntimeIdentifierSet,
    pub runtime_copy_local: bool,
    pub runtime_pack_always_copy_local: bool,
    pub is_windows_only: bool,
    pub package_conflict_preferred_packages: Vec<String>,
}

impl KnownFrameworkReference {
    /// Copy-local rows are satisfied entirely by runtime packs and never
    /// appear in the runtime config's framework list.
    pub fn is_copy_local(&self) -> bool {
        self.runtime_copy_local || self.runtime_pack_always_copy_local
    }

    pub fn platform_version(&self) -> Option<&FxVersion> {
        self.target_framework.platform_version()
    }

    /// Can a project targeting `effective` use this row? The framework
    /// identifiers must match and the row must not ask for a newer framework
    /// (or platform) version than the project has.
    pub fn applies_to(&self, effective: &TargetFramework) -> bool {
        let declared = &self.target_framework;
        if !effective.is_identifier(&declared.identifier) || declared.version > effective.version {
            return false;
        }

        match (&declared.platform, &effective.platform) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(dp), Some(ep)) => {
                if !unicase::eq_ascii(dp.identifier.as_str(), ep.identifier.as_str()) {
                    return false;
                }
                match (&dp.version, &ep.version) {
                    (None, _) => true,
                    (Some(_), None) => false,
                    (Some(dv), Some(ev)) => dv <= ev,
                }
            }
        }
    }
}

impl RawKnownFrameworkReference {
    /// Validates every field, failing on the first bad one.
    pub fn validate(&self) -> FxLibResult<KnownFrameworkReference> {
        let name = self.required("Include", &self.include)?;

        let mut target_framework = TargetFramework::parse(self.required("TargetFramework", &self.target_framework)?)
            .map_err(|e| self.malformed("TargetFramework", &self.target_framework, e))?;
        if !self.profile.trim().is_empty() {
            target_framework = target_framework.with_profile(self.profile.trim());
        }

        let runtime_framework_name = self.required("RuntimeFrameworkName", &self.runtime_framework_name)?;
        let default_runtime_framework_version = self.version("DefaultRuntimeFrameworkVersion", &self.default_runtime_framework_version)?;
        let latest_runtime_framework_version = if self.latest_runtime_framework_version.trim().is_empty() {
            default_runtime_framework_version.clone()
        } else {
            self.version("LatestRuntimeFrameworkVersion", &self.latest_runtime_framework_version)?
        };

        let runtime_framework_name = runtime_framework_name.to_owned();
        let mut package_conflict_preferred_packages = split_list(&self.package_conflict_preferred_packages);
        if package_conflict_preferred_packages.is_empty() {
            package_conflict_preferred_packages.push(runtime_framework_name.clone());
        }

        Ok(KnownFrameworkReference {
            name: name.to_owned(),
            target_framework,
            runtime_framework_name,
            default_runtime_framework_version,
            latest_runtime_framework_version,
            targeting_pack_name: self.required("TargetingPackName", &self.targeting_pack_name)?.to_owned(),
            targeting_pack_version: self.version("TargetingPackVersion", &self.targeting_pack_version)?,
            runtime_pack_name_patterns: split_list(&self.runtime_pack_name_patterns),
            runtime_pack_runtime_identifiers: RuntimeIdentifierSet::parse(&self.runtime_pack_runtime_identifiers),
            runtime_copy_local: self.flag("RuntimeCopyLocal", &self.runtime_copy_local)?,
            runtime_pack_always_copy_local: self.flag("RuntimePackAlwaysCopyLocal", &self.runtime_pack_always_copy_local)?,
            is_windows_only: self.flag("IsWindowsOnly", &self.is_windows_only)?,
            package_conflict_preferred_packages,
        })
    }

    fn required<'a>(&self, field: &'static str, value: &'a str) -> FxLibResult<&'a str> {
        let value = value.trim();
        if value.is_empty() {
            Err(FxLibError::MalformedTableRow {
                name: self.include.clone(),
                field,
                value: value.to_owned(),
                reason: "a value is required".to_owned(),
            })
        } else {
            Ok(value)
        }
    }

    fn version(&self, field: &'static str, value: &str) -> FxLibResult<FxVersion> {
        let value = self.required(field, value)?;
        FxVersion::parse(value).map_err(|e| self.malformed(field, value, e))
    }

    fn flag(&self, field: &'static str, value: &str) -> FxLibResult<bool> {
        let value = value.trim();
        if value.is_empty() || unicase::eq_ascii(value, "false") {
            Ok(false)
        } else if unicase::eq_ascii(value, "true") {
            Ok(true)
        } else {
            Err(FxLibError::MalformedTableRow {
                name: self.include.clone(),
                field,
                value: value.to_owned(),
                reason: "expected 'true' or 'false'".to_owned(),
            })
        }
    }

    fn malformed(&self, field: &'static str, value: &str, err: FxLibError) -> FxLibError {
        FxLibError::MalformedTableRow {
            name: self.include.clone(),
            field,
            value: value.to_owned(),
            reason: err.to_string(),
        }
    }
}
