use clap::{App, Arg};
use fxlib::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Default)]
/// The command line options.
pub struct Options {
    pub dump_example_config: bool,
    pub verbose: bool,
    pub table: Option<PathBuf>,
    pub target_framework: Option<String>,
    pub references: Vec<String>,
    pub runtime_identifiers: Vec<String>,
    pub self_contained: bool,
    pub no_targeting_pack_download: bool,
    pub target_latest_runtime_patch: bool,
    pub enable_windows_targeting: bool,
    pub roll_forward: Option<String>,
    pub config_directory: PathBuf,
    pub output_directory: PathBuf,
    pub runtime_config: Option<PathBuf>,
}

impl Options {
    /// Command line switches win over the configuration file. Switches that
    /// were not given leave the configured value alone.
    pub fn apply_to(&self, configuration: &mut Configuration) -> FxLibResult<()> {
        let resolver = &mut configuration.resolver;
        if self.self_contained {
            resolver.self_contained = true;
        }
        if self.no_targeting_pack_download {
            resolver.enable_targeting_pack_download = false;
        }
        if self.target_latest_runtime_patch {
            resolver.target_latest_runtime_patch = true;
        }
        if self.enable_windows_targeting {
            resolver.enable_windows_targeting = true;
        }
        if !self.runtime_identifiers.is_empty() {
            resolver.runtime_identifiers = self.runtime_identifiers.clone();
        }
        if let Some(ref rf) = self.roll_forward {
            configuration.runtime_config.roll_forward = Some(RollForward::parse(rf)?);
        }

        Ok(())
    }

    /// The references named on the command line, else every distinct name in
    /// the table.
    pub fn requests(&self, table: &KnownFrameworkReferenceTable) -> Vec<FrameworkReferenceRequest> {
        let mut names: Vec<&str> = self.references.iter().map(|r| r.as_str()).collect();
        if names.is_empty() {
            for row in table.rows() {
                if !names.iter().any(|n| unicase::eq_ascii(*n, row.name.as_str())) {
                    names.push(&row.name);
                }
            }
        }

        names.into_iter().map(FrameworkReferenceRequest::new).collect()
    }
}

fn values(matches: &clap::ArgMatches, name: &str) -> Vec<String> {
    matches.values_of(name)
        .map(|vals| vals.map(|v| v.to_owned()).collect())
        .unwrap_or_default()
}

pub fn get_options() -> Options {
    let matches = App::new("fxresolve")
        .version("0.1")
        .author("Philip Daniels <philip.daniels1971@gmail.com")
        .about("Resolves .Net framework references against a table of known framework references")
        .arg(
            Arg::with_name("dump-example-config")
                .short("x")
                .help("Prints the default configuration to stdout (for use as the basis of a custom configuration file)")
                .conflicts_with_all(&["table", "verbose"]),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Prints a summary of what was resolved")
        )
        .arg(
            Arg::with_name("table")
                .short("t")
                .long("table")
                .takes_value(true)
                .help("A JSON file containing the array of known framework references")
        )
        .arg(
            Arg::with_name("target-framework")
                .short("f")
                .long("target-framework")
                .takes_value(true)
                .help("The project's target framework, e.g. netcoreapp3.0 or net5.0-windows10.0.18362")
        )
        .arg(
            Arg::with_name("reference")
                .short("r")
                .long("reference")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("A framework reference to resolve. Can be repeated. Defaults to every name in the table")
        )
        .arg(
            Arg::with_name("runtime-identifier")
                .long("runtime-identifier")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("A runtime identifier to resolve runtime packs for. Can be repeated")
        )
        .arg(Arg::with_name("self-contained").long("self-contained").help("Resolve for a self-contained deployment"))
        .arg(Arg::with_name("no-targeting-pack-download").long("no-targeting-pack-download").help("Silently ignore references that cannot be resolved"))
        .arg(Arg::with_name("target-latest-runtime-patch").long("target-latest-runtime-patch").help("Use the latest known runtime framework versions"))
        .arg(Arg::with_name("enable-windows-targeting").long("enable-windows-targeting").help("Allow Windows-only framework references on other platforms"))
        .arg(
            Arg::with_name("roll-forward")
                .long("roll-forward")
                .takes_value(true)
                .help("The roll forward policy written to the runtime config")
        )
        .arg(
            Arg::with_name("config-directory")
                .short("c")
                .long("config-directory")
                .takes_value(true)
                .help("The directory to look for a .fxresolve.json configuration file in. Defaults to the current directory")
        )
        .arg(
            Arg::with_name("output-directory")
                .short("o")
                .long("output-directory")
                .takes_value(true)
                .help("Specifies the output directory where CSV files will be written. Can be relative or absolute.")
        )
        .arg(
            Arg::with_name("runtime-config")
                .long("runtime-config")
                .takes_value(true)
                .help("Also writes a runtimeconfig.json for the resolved runtime frameworks to this path")
        )
        .get_matches();

    Options {
        dump_example_config: matches.is_present("dump-example-config"),
        verbose: matches.is_present("verbose"),
        table: matches.value_of("table").map(PathBuf::from),
        target_framework: matches.value_of("target-framework").map(|s| s.to_owned()),
        references: values(&matches, "reference"),
        runtime_identifiers: values(&matches, "runtime-identifier"),
        self_contained: matches.is_present("self-contained"),
        no_targeting_pack_download: matches.is_present("no-targeting-pack-download"),
        target_latest_runtime_patch: matches.is_present("target-latest-runtime-patch"),
        enable_windows_targeting: matches.is_present("enable-windows-targeting"),
        roll_forward: matches.value_of("roll-forward").map(|s| s.to_owned()),
        config_directory: PathBuf::from(matches.value_of("config-directory").unwrap_or(".")),
        output_directory: PathBuf::from(matches.value_of("output-directory").unwrap_or(".")),
        runtime_config: matches.value_of("runtime-config").map(PathBuf::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn apply_to_only_overrides_given_switches() {
        let mut cfg = Configuration::default();
        cfg.resolver.runtime_identifiers = vec!["linux-x64".to_owned()];

        let options = Options {
            no_targeting_pack_download: true,
            roll_forward: Some("latestMajor".to_owned()),
            ..Default::default()
        };
        options.apply_to(&mut cfg).unwrap();

        assert!(!cfg.resolver.enable_targeting_pack_download);
        assert!(!cfg.resolver.self_contained);
        assert_eq!(cfg.resolver.runtime_identifiers, vec!["linux-x64"]);
        assert_eq!(cfg.runtime_config.roll_forward, Some(RollForward::LatestMajor));
    }

    fn table() -> KnownFrameworkReferenceTable {
        let row = |name: &str, tf: &str| format!(r##"{{
            "Include": "{}",
            "TargetFramework": "{}",
            "RuntimeFrameworkName": "{}",
            "DefaultRuntimeFrameworkVersion": "3.0.0",
            "TargetingPackName": "{}.Ref",
            "TargetingPackVersion": "3.0.0"
        }}"##, name, tf, name, name);

        let json = format!("[{}, {}, {}]",
            row("Microsoft.NETCore.App", "netcoreapp3.0"),
            row("Microsoft.AspNetCore.App", "netcoreapp3.0"),
            row("microsoft.netcore.app", "net5.0"));
        KnownFrameworkReferenceTable::from_json(&json).unwrap()
    }

    #[test]
    pub fn requests_default_to_every_distinct_table_name() {
        let names = Options::default().requests(&table()).into_iter().map(|r| r.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Microsoft.NETCore.App", "Microsoft.AspNetCore.App"]);
    }

    #[test]
    pub fn named_references_replace_the_default() {
        let options = Options {
            references: vec!["Microsoft.WindowsDesktop.App".to_owned()],
            ..Default::default()
        };
        let names = options.requests(&table()).into_iter().map(|r| r.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Microsoft.WindowsDesktop.App"]);
    }

    #[test]
    pub fn apply_to_rejects_unknown_roll_forward() {
        let options = Options {
            roll_forward: Some("Whenever".to_owned()),
            ..Default::default()
        };
        assert!(options.apply_to(&mut Configuration::default()).is_err());
    }
}
