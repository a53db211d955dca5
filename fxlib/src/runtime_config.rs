use crate::errors::{FxLibError, FxLibResult};
use crate::resolver::RuntimeFramework;
use crate::target_framework::TargetFramework;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// The run-time policy for picking an installed framework newer than the
/// one the application was built against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum RollForward {
    Minor,
    LatestMinor,
    Major,
    LatestMajor,
    LatestPatch,
    Disable,
}

impl RollForward {
    pub fn parse(s: &str) -> FxLibResult<Self> {
        RollForward::from_str(s.trim()).map_err(|_| FxLibError::InvalidRollForward(s.to_owned()))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfigSettings {
    pub roll_forward: Option<RollForward>,
    pub config_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameworkEntry {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeOptions {
    pub tfm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_forward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<FrameworkEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_frameworks: Vec<FrameworkEntry>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub config_properties: BTreeMap<String, Value>,
}

/// The contents of an application's `runtimeconfig.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub runtime_options: RuntimeOptions,
}

impl RuntimeConfig {
    pub fn new(
        target_framework: &TargetFramework,
        runtime_frameworks: &[RuntimeFramework],
        settings: &RuntimeConfigSettings,
        self_contained: bool,
    ) -> Self {
        let entries = distinct_frameworks(runtime_frameworks);

        let mut options = RuntimeOptions {
            tfm: target_framework.short_name(),
            roll_forward: None,
            framework: None,
            frameworks: vec![],
            included_frameworks: vec![],
            config_properties: settings.config_properties.iter()
                .map(|(k, v)| (k.clone(), property_value(v)))
                .collect(),
        };

        if self_contained {
            options.included_frameworks = entries;
        } else {
            options.roll_forward = settings.roll_forward.map(|rf| rf.to_string());
            if entries.len() == 1 {
                options.framework = entries.into_iter().next();
            } else {
                options.frameworks = entries;
            }
        }

        RuntimeConfig { runtime_options: options }
    }

    pub fn to_json(&self) -> FxLibResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> FxLibResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// One entry per runtime framework name, keeping the highest version and
/// first-seen order.
fn distinct_frameworks(runtime_frameworks: &[RuntimeFramework]) -> Vec<FrameworkEntry> {
    let mut distinct: Vec<&RuntimeFramework> = vec![];
    for rf in runtime_frameworks {
        match distinct.iter_mut().find(|d| unicase::eq_ascii(d.name.as_str(), rf.name.as_str())) {
            Some(existing) => if rf.version > existing.version { *existing = rf },
            None => distinct.push(rf),
        }
    }

    distinct.into_iter()
        .map(|rf| FrameworkEntry { name: rf.name.clone(), version: rf.version.to_string() })
        .collect()
}

fn property_value(text: &str) -> Value {
    let trimmed = text.trim();
    if unicase::eq_ascii(trimmed, "true") {
        Value::Bool(true)
    } else if unicase::eq_ascii(trimmed, "false") {
        Value::Bool(false)
    } else if let Ok(n) = trimmed.parse::<i64>() {
        Value::from(n)
    } else {
        Value::String(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::FxVersion;
    use serde_json::json;

    fn rf(name: &str, version: &str) -> RuntimeFramework {
        RuntimeFramework {
            name: name.to_owned(),
            version: FxVersion::parse(version).unwrap(),
            framework_name: name.to_owned(),
        }
    }

    fn tf() -> TargetFramework {
        TargetFramework::parse("netcoreapp3.0").unwrap()
    }

    fn as_value(config: &RuntimeConfig) -> Value {
        serde_json::from_str(&config.to_json().unwrap()).unwrap()
    }

    #[test]
    pub fn single_framework_uses_framework_property() {
        let settings = RuntimeConfigSettings {
            roll_forward: Some(RollForward::LatestMinor),
            ..Default::default()
        };
        let config = RuntimeConfig::new(&tf(), &[rf("Microsoft.NETCore.App", "3.0")], &settings, false);

        assert_eq!(as_value(&config), json!({
            "runtimeOptions": {
                "tfm": "netcoreapp3.0",
                "rollForward": "LatestMinor",
                "framework": { "name": "Microsoft.NETCore.App", "version": "3.0.0" }
            }
        }));
    }

    #[test]
    pub fn multiple_frameworks_use_frameworks_array() {
        let config = RuntimeConfig::new(
            &tf(),
            &[rf("Microsoft.NETCore.App", "3.0.0"), rf("Microsoft.AspNetCore.App", "3.0.1"), rf("microsoft.netcore.app", "3.0.2")],
            &RuntimeConfigSettings::default(),
            false);

        assert_eq!(as_value(&config), json!({
            "runtimeOptions": {
                "tfm": "netcoreapp3.0",
                "frameworks": [
                    { "name": "microsoft.netcore.app", "version": "3.0.2" },
                    { "name": "Microsoft.AspNetCore.App", "version": "3.0.1" }
                ]
            }
        }));
    }

    #[test]
    pub fn self_contained_uses_included_frameworks() {
        let mut settings = RuntimeConfigSettings::default();
        settings.roll_forward = Some(RollForward::Major);
        settings.config_properties.insert("System.GC.Server".to_owned(), "true".to_owned());
        settings.config_properties.insert("System.GC.HeapCount".to_owned(), "4".to_owned());
        settings.config_properties.insert("Custom".to_owned(), "text".to_owned());

        let config = RuntimeConfig::new(&tf(), &[rf("Microsoft.NETCore.App", "3.0.0")], &settings, true);
        assert_eq!(as_value(&config), json!({
            "runtimeOptions": {
                "tfm": "netcoreapp3.0",
                "includedFrameworks": [{ "name": "Microsoft.NETCore.App", "version": "3.0.0" }],
                "configProperties": { "Custom": "text", "System.GC.HeapCount": 4, "System.GC.Server": true }
            }
        }));
    }

    #[test]
    pub fn roll_forward_parses_case_insensitively() {
        assert_eq!(RollForward::parse("latestminor").unwrap(), RollForward::LatestMinor);
        assert_eq!(RollForward::parse(" Disable ").unwrap(), RollForward::Disable);
        assert!(RollForward::parse("Sometimes").is_err());
        assert_eq!(RollForward::LatestPatch.to_string(), "LatestPatch");
    }
}
