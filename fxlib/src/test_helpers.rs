use crate::known_framework_reference::RawKnownFrameworkReference;

/// The row shape used throughout the resolver tests.
pub fn raw_row(name: &str, target_framework: &str) -> RawKnownFrameworkReference {
    RawKnownFrameworkReference {
        include: name.to_owned(),
        target_framework: target_framework.to_owned(),
        runtime_framework_name: name.to_owned(),
        default_runtime_framework_version: "1.9.5".to_owned(),
        latest_runtime_framework_version: "1.9.6".to_owned(),
        targeting_pack_name: format!("{}.Ref", name),
        targeting_pack_version: "1.9.0".to_owned(),
        runtime_pack_name_patterns: format!("{}.Runtime.**RID**", name),
        runtime_pack_runtime_identifiers: "win-x64;win-x86".to_owned(),
        ..Default::default()
    }
}
