mod csv_output;
mod errors;
mod options;

use errors::{ResolveError, ResolveResult};
use options::Options;
use fxlib::prelude::*;
use log::info;
use logging_timer::{finish, timer};
use std::fs;

fn main() {
    env_logger::init();
    let options = options::get_options();

    if options.dump_example_config {
        if let Err(e) = Configuration::dump_defaults() {
            eprintln!("Could not write the default configuration: {}", e);
            std::process::exit(1);
        }
        std::process::exit(0);
    }

    if !options.output_directory.is_dir() {
        eprintln!("The directory {:?} does not exist or is a file.", options.output_directory);
        std::process::exit(1);
    }

    let mut configuration = Configuration::new(&options.config_directory);
    if let Err(e) = options.apply_to(&mut configuration) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let start = std::time::Instant::now();
    match run_resolution(&options, &configuration) {
        Ok(true) => if options.verbose { println!("Resolution completed without errors in {:?}", start.elapsed()) },
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error occurred {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns false if any diagnostics were reported. The CSV files are written
/// either way.
pub fn run_resolution(options: &Options, configuration: &Configuration) -> ResolveResult<bool> {
    let table_path = options.table.as_ref().ok_or(ResolveError::MissingArgument("a known framework reference table"))?;
    let target_framework = options.target_framework.as_ref().ok_or(ResolveError::MissingArgument("a target framework"))?;

    let table = KnownFrameworkReferenceTable::from_json(&fs::read_to_string(table_path)?)?;
    let target_framework = TargetFramework::parse(target_framework)?;
    info!("Loaded {} known framework references from {:?}", table.len(), table_path);

    let mut succeeded = true;
    if let Err(e) = PlatformVersionValidator::new(&table).validate_target_framework(&target_framework) {
        eprintln!("error: {}", e);
        succeeded = false;
    }

    let requests = options.requests(&table);
    let resolver = ReferenceResolver::new(&table, configuration.resolver.clone());
    let report = resolver.resolve_all(&requests, &target_framework);
    for diagnostic in &report.diagnostics {
        eprintln!("error: {}", diagnostic);
    }
    succeeded &= !report.has_errors();

    if options.verbose {
        println!("Resolved {} of {} framework references for {}",
            report.matched().count(),
            requests.len(),
            target_framework);
    }

    let tmr = timer!("Write CSV Files");
    csv_output::write_files(&options.output_directory, &report)?;
    finish!(tmr, "OutputDirectory={:?}", options.output_directory);

    if let Some(ref path) = options.runtime_config {
        let runtime_frameworks = report.runtime_frameworks().cloned().collect::<Vec<_>>();
        let runtime_config = RuntimeConfig::new(
            &target_framework,
            &runtime_frameworks,
            &configuration.runtime_config,
            configuration.resolver.self_contained);
        runtime_config.write_to(fs::File::create(path)?)?;
        info!("Wrote runtime config to {:?}", path);
    }

    Ok(succeeded)
}
