use crate::errors::FxLibResult;
use crate::resolver::ResolverSettings;
use crate::runtime_config::RuntimeConfigSettings;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".fxresolve.json";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub resolver: ResolverSettings,
    pub runtime_config: RuntimeConfigSettings,
}

impl Configuration {
    pub fn new<P>(project_directory: P) -> Self
    where P: AsRef<Path>
    {
        for path in Self::candidate_paths(project_directory.as_ref()) {
            if let Some(cfg) = Self::load_from_file(&path) {
                info!("Loaded configuration from {:?}", path);
                return cfg;
            }
        }

        // If not found, use default settings.
        Configuration::default()
    }

    /// The project directory first, then beside the exe, then the home dir.
    fn candidate_paths(project_directory: &Path) -> Vec<PathBuf> {
        let mut paths = vec![project_directory.join(CONFIG_FILE)];

        if let Ok(exe_path) = env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                paths.push(exe_dir.join(CONFIG_FILE));
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(CONFIG_FILE));
        }

        paths
    }

    pub fn to_json(&self) -> FxLibResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the default settings to stdout.
    pub fn dump_defaults() -> FxLibResult<()> {
        use std::io::Write;

        let serialized = Configuration::default().to_json()?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", serialized)?;
        handle.flush()?;
        Ok(())
    }

    fn load_from_file(path: &Path) -> Option<Configuration> {
        match fs::File::open(path) {
            Ok(f) => match serde_json::from_reader(io::BufReader::new(f)) {
                Ok(r) => Some(r),
                Err(e) => { warn!("Could not parse JSON in {:?}: {}", path, e); None },
            },
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => { warn!("Error opening config file {:?}: {}", path, e); None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_config::RollForward;
    use crate::runtime_identifier::AnyRuntimeIdentifierPolicy;
    use std::fs::File;
    use std::io::Write;

    fn make_temporary_directory() -> io::Result<tempfile::TempDir> {
        tempfile::Builder::new()
            .prefix("fxlib-temp-")
            .rand_bytes(5)
            .tempdir()
    }

    #[test]
    pub fn defaults_enable_targeting_pack_download() {
        let cfg = Configuration::default();
        assert!(cfg.resolver.enable_targeting_pack_download);
        assert!(!cfg.resolver.self_contained);
        assert_eq!(cfg.resolver.any_runtime_identifier_policy, AnyRuntimeIdentifierPolicy::Defer);
        assert_eq!(cfg.resolver.host_is_windows, cfg!(windows));
        assert!(cfg.runtime_config.roll_forward.is_none());
    }

    #[test]
    pub fn loads_partial_file_from_project_directory() {
        let dir = make_temporary_directory().unwrap();
        let mut file = File::create(dir.path().join(CONFIG_FILE)).unwrap();
        writeln!(file, r#"{{
            "resolver": {{
                "self_contained": true,
                "runtime_identifiers": ["win-x64"],
                "any_runtime_identifier_policy": {{ "Expand": ["linux-x64"] }}
            }},
            "runtime_config": {{ "roll_forward": "LatestMinor" }}
        }}"#).unwrap();

        let cfg = Configuration::new(dir.path());
        assert!(cfg.resolver.self_contained);
        assert!(cfg.resolver.enable_targeting_pack_download);
        assert_eq!(cfg.resolver.runtime_identifiers, vec!["win-x64"]);
        assert_eq!(cfg.resolver.any_runtime_identifier_policy, AnyRuntimeIdentifierPolicy::Expand(vec!["linux-x64".to_owned()]));
        assert_eq!(cfg.runtime_config.roll_forward, Some(RollForward::LatestMinor));
    }

    #[test]
    pub fn unparsable_file_is_skipped() {
        let dir = make_temporary_directory().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "this is not json").unwrap();

        assert!(Configuration::load_from_file(&path).is_none());
        assert!(Configuration::load_from_file(&dir.path().join("missing.json")).is_none());
    }

    #[test]
    pub fn to_json_round_trips_through_serde() {
        let mut cfg = Configuration::default();
        cfg.resolver.target_latest_runtime_patch = true;
        cfg.runtime_config.config_properties.insert("System.GC.Server".to_owned(), "true".to_owned());

        let json = cfg.to_json().unwrap();
        let parsed: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
