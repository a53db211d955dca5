use csv;
use fxlib::prelude::*;
use crate::errors::ResolveResult;
use std::path::Path;

pub fn write_files(output_directory: &Path, report: &ResolutionReport) -> ResolveResult<()> {
    write_packages_to_download(output_directory, report)?;
    write_runtime_frameworks(output_directory, report)?;
    write_targeting_packs(output_directory, report)?;
    write_runtime_packs(output_directory, report)?;
    Ok(())
}

fn write_packages_to_download(output_directory: &Path, report: &ResolutionReport) -> ResolveResult<()> {
    let mut wtr = csv::Writer::from_path(output_directory.join("packages_to_download.csv"))?;
    wtr.write_record(&["Id", "Version"])?;

    for pkg in report.packages_to_download() {
        wtr.write_record(&[
            pkg.id.as_str(),
            &pkg.version.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_runtime_frameworks(output_directory: &Path, report: &ResolutionReport) -> ResolveResult<()> {
    let mut wtr = csv::Writer::from_path(output_directory.join("runtime_frameworks.csv"))?;
    wtr.write_record(&["Name", "Version", "FrameworkName"])?;

    for rf in report.runtime_frameworks() {
        wtr.write_record(&[
            rf.name.as_str(),
            &rf.version.to_string(),
            rf.framework_name.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_targeting_packs(output_directory: &Path, report: &ResolutionReport) -> ResolveResult<()> {
    let mut wtr = csv::Writer::from_path(output_directory.join("targeting_packs.csv"))?;
    wtr.write_record(&[
        "FrameworkName", "PackageId", "PackageVersion",
        "PackageConflictPreferredPackages", "RuntimeFrameworkName",
        "RuntimeIdentifier", "TargetFramework"
        ])?;

    for tp in report.targeting_packs() {
        wtr.write_record(&[
            tp.framework_name.as_str(),
            tp.package_id.as_str(),
            &tp.package_version.to_string(),
            &tp.package_conflict_preferred_packages.join(";"),
            tp.runtime_framework_name.as_str(),
            tp.runtime_identifier.as_str(),
            tp.target_framework.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_runtime_packs(output_directory: &Path, report: &ResolutionReport) -> ResolveResult<()> {
    let mut wtr = csv::Writer::from_path(output_directory.join("runtime_packs.csv"))?;
    wtr.write_record(&["FrameworkName", "PackageId", "PackageVersion", "RuntimeIdentifier", "IsCopyLocal"])?;

    for rp in report.runtime_packs() {
        wtr.write_record(&[
            rp.framework_name.as_str(),
            rp.package_id.as_str(),
            &rp.package_version.to_string(),
            rp.runtime_identifier.as_str(),
            rp.is_copy_local.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn report() -> ResolutionReport {
        let json = r##"[{
            "Include": "Microsoft.WindowsDesktop.App",
            "TargetFramework": "netcoreapp3.0",
            "RuntimeFrameworkName": "Microsoft.WindowsDesktop.App",
            "DefaultRuntimeFrameworkVersion": "3.0.0",
            "TargetingPackName": "Microsoft.WindowsDesktop.App.Ref",
            "TargetingPackVersion": "3.0.0",
            "RuntimePackNamePatterns": "Microsoft.WindowsDesktop.App.Runtime.**RID**",
            "RuntimePackRuntimeIdentifiers": "win-x64;win-x86"
        }]"##;
        let table = KnownFrameworkReferenceTable::from_json(json).unwrap();

        let mut settings = ResolverSettings::default();
        settings.runtime_identifiers = vec!["win-x64".to_owned()];
        settings.host_is_windows = true;

        let resolver = ReferenceResolver::new(&table, settings);
        let tf = TargetFramework::parse("netcoreapp3.0").unwrap();
        resolver.resolve_all(&[FrameworkReferenceRequest::new("Microsoft.WindowsDesktop.App")], &tf)
    }

    #[test]
    pub fn writes_one_file_per_item_type() {
        let dir = tempfile::Builder::new().prefix("fxresolve-temp-").tempdir().unwrap();
        write_files(dir.path(), &report()).unwrap();

        let packages = fs::read_to_string(dir.path().join("packages_to_download.csv")).unwrap();
        assert_eq!(packages, "Id,Version\nMicrosoft.WindowsDesktop.App.Ref,3.0.0\n");

        let frameworks = fs::read_to_string(dir.path().join("runtime_frameworks.csv")).unwrap();
        assert!(frameworks.contains("Microsoft.WindowsDesktop.App,3.0.0,Microsoft.WindowsDesktop.App"));

        let targeting = fs::read_to_string(dir.path().join("targeting_packs.csv")).unwrap();
        assert!(targeting.contains(",win-x64,netcoreapp3.0"));

        let runtime = fs::read_to_string(dir.path().join("runtime_packs.csv")).unwrap();
        assert!(runtime.contains("Microsoft.WindowsDesktop.App.Runtime.win-x64,3.0.0,win-x64,false"));
        assert!(!runtime.contains("win-x86"));
    }
}
