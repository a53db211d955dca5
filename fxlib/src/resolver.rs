use crate::errors::FxLibError;
use crate::known_framework_reference::KnownFrameworkReference;
use crate::runtime_identifier::{substitute_runtime_identifier, AnyRuntimeIdentifierPolicy, RuntimeIdentifierSet};
use crate::table::KnownFrameworkReferenceTable;
use crate::target_framework::TargetFramework;
use crate::version::FxVersion;
use log::debug;
use logging_timer::{finish, timer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// The feature switches that shape resolution.
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// When set, an unresolvable reference is an error and runtime packs
    /// that are needed are added to the packages to download.
    #[default(true)]
    pub enable_targeting_pack_download: bool,
    pub self_contained: bool,
    /// Use the latest known runtime framework version instead of the default.
    pub target_latest_runtime_patch: bool,
    /// Allows Windows-only framework references to be built elsewhere.
    pub enable_windows_targeting: bool,
    pub runtime_identifiers: Vec<String>,
    pub any_runtime_identifier_policy: AnyRuntimeIdentifierPolicy,
    #[serde(skip)]
    #[default(cfg!(windows))]
    pub host_is_windows: bool,
}

/// A framework reference declared by the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkReferenceRequest {
    pub name: String,
    pub targeting_pack_version: Option<FxVersion>,
    pub runtime_framework_version: Option<FxVersion>,
}

impl FrameworkReferenceRequest {
    pub fn new<S: Into<String>>(name: S) -> Self {
        FrameworkReferenceRequest {
            name: name.into(),
            targeting_pack_version: None,
            runtime_framework_version: None,
        }
    }

    pub fn with_targeting_pack_version(mut self, version: FxVersion) -> Self {
        self.targeting_pack_version = Some(version);
        self
    }

    pub fn with_runtime_framework_version(mut self, version: FxVersion) -> Self {
        self.runtime_framework_version = Some(version);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageToDownload {
    pub id: String,
    pub version: FxVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeFramework {
    pub name: String,
    pub version: FxVersion,
    /// The framework reference this came from.
    pub framework_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetingPack {
    pub framework_name: String,
    pub package_id: String,
    pub package_version: FxVersion,
    /// Used later when resolving assembly version conflicts.
    pub package_conflict_preferred_packages: Vec<String>,
    pub runtime_framework_name: String,
    pub runtime_identifier: Option<String>,
    pub target_framework: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePack {
    pub framework_name: String,
    pub package_id: String,
    pub package_version: FxVersion,
    /// `None` while the runtime identifier is still unbound.
    pub runtime_identifier: Option<String>,
    pub is_copy_local: bool,
}

/// The outcome of resolving one framework reference against its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub known_framework_reference: KnownFrameworkReference,
    pub packages_to_download: Vec<PackageToDownload>,
    pub runtime_frameworks: Vec<RuntimeFramework>,
    pub targeting_packs: Vec<TargetingPack>,
    pub runtime_packs: Vec<RuntimePack>,
}

/// The result of a single request plus anything worth reporting about it.
/// Problems are collected here rather than returned as errors so that a
/// build can report all of them at once.
#[derive(Debug, Default)]
pub struct Resolution {
    pub result: Option<ResolutionResult>,
    pub diagnostics: Vec<FxLibError>,
}

impl Resolution {
    pub fn is_match(&self) -> bool {
        self.result.is_some()
    }
}

/// Results for a batch of requests, in request order.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub results: Vec<Option<ResolutionResult>>,
    pub diagnostics: Vec<FxLibError>,
}

impl ResolutionReport {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn matched(&self) -> impl Iterator<Item = &ResolutionResult> {
        self.results.iter().filter_map(|r| r.as_ref())
    }

    pub fn packages_to_download(&self) -> impl Iterator<Item = &PackageToDownload> {
        self.matched().flat_map(|r| r.packages_to_download.iter())
    }

    pub fn runtime_frameworks(&self) -> impl Iterator<Item = &RuntimeFramework> {
        self.matched().flat_map(|r| r.runtime_frameworks.iter())
    }

    pub fn targeting_packs(&self) -> impl Iterator<Item = &TargetingPack> {
        self.matched().flat_map(|r| r.targeting_packs.iter())
    }

    pub fn runtime_packs(&self) -> impl Iterator<Item = &RuntimePack> {
        self.matched().flat_map(|r| r.runtime_packs.iter())
    }
}

/// Maps framework references onto targeting packs, runtime packs, runtime
/// frameworks and packages to download.
#[derive(Debug)]
pub struct ReferenceResolver<'a> {
    table: &'a KnownFrameworkReferenceTable,
    settings: ResolverSettings,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(table: &'a KnownFrameworkReferenceTable, settings: ResolverSettings) -> Self {
        ReferenceResolver { table, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn resolve(&self, request: &FrameworkReferenceRequest, effective: &TargetFramework) -> Resolution {
        let mut resolution = Resolution::default();

        match self.table.find_best_row(&request.name, effective) {
            Some(row) => {
                let result = self.derive(request, row, effective, &mut resolution.diagnostics);
                debug!("Resolved {} for {}: TargetingPack={} {} RuntimeFrameworks={} RuntimePacks={}",
                    request.name,
                    effective,
                    row.targeting_pack_name,
                    result.targeting_packs[0].package_version,
                    result.runtime_frameworks.len(),
                    result.runtime_packs.len());
                resolution.result = Some(result);
            }
            None if self.settings.enable_targeting_pack_download => {
                resolution.diagnostics.push(FxLibError::UnresolvedFrameworkReference {
                    name: request.name.clone(),
                    target_framework: effective.to_string(),
                });
            }
            None => {
                debug!("No known framework reference for {} on {}, ignoring", request.name, effective);
            }
        }

        resolution
    }

    /// Resolves every request independently. A failure for one request
    /// never stops the others.
    pub fn resolve_all(&self, requests: &[FrameworkReferenceRequest], effective: &TargetFramework) -> ResolutionReport {
        let tmr = timer!("Resolve Framework References", "TargetFramework={}", effective);

        let resolutions = requests.par_iter()
            .map(|request| self.resolve(request, effective))
            .collect::<Vec<_>>();

        let mut report = ResolutionReport::default();
        for resolution in resolutions {
            report.results.push(resolution.result);
            report.diagnostics.extend(resolution.diagnostics);
        }

        finish!(tmr, "NumRequests={} NumMatched={} NumDiagnostics={}",
            requests.len(),
            report.matched().count(),
            report.diagnostics.len());

        report
    }

    fn derive(
        &self,
        request: &FrameworkReferenceRequest,
        row: &KnownFrameworkReference,
        effective: &TargetFramework,
        diagnostics: &mut Vec<FxLibError>,
    ) -> ResolutionResult {
        if row.is_windows_only && !self.settings.host_is_windows && !self.settings.enable_windows_targeting {
            diagnostics.push(FxLibError::WindowsOnlyFrameworkReference { name: request.name.clone() });
        }

        let targeting_pack_version = request.targeting_pack_version.clone()
            .unwrap_or_else(|| row.targeting_pack_version.clone());

        let runtime_framework_version = match request.runtime_framework_version {
            Some(ref v) => v.clone(),
            None if self.settings.target_latest_runtime_patch => row.latest_runtime_framework_version.clone(),
            None => row.default_runtime_framework_version.clone(),
        };

        let mut packages_to_download = vec![PackageToDownload {
            id: row.targeting_pack_name.clone(),
            version: targeting_pack_version.clone(),
        }];

        let runtime_frameworks = if row.is_copy_local() {
            vec![]
        } else {
            vec![RuntimeFramework {
                name: row.runtime_framework_name.clone(),
                version: runtime_framework_version.clone(),
                framework_name: request.name.clone(),
            }]
        };

        let runtime_identifier = match self.settings.runtime_identifiers.as_slice() {
            [single] => Some(single.clone()),
            _ => None,
        };

        let targeting_packs = vec![TargetingPack {
            framework_name: request.name.clone(),
            package_id: row.targeting_pack_name.clone(),
            package_version: targeting_pack_version,
            package_conflict_preferred_packages: preferred_packages(row),
            runtime_framework_name: row.runtime_framework_name.clone(),
            runtime_identifier,
            target_framework: effective.to_string(),
        }];

        let runtime_pack_needed = self.settings.self_contained || row.is_copy_local();
        let mut runtime_packs = vec![];
        if !row.runtime_pack_name_patterns.is_empty() {
            let targets = self.runtime_pack_targets(request, row, runtime_pack_needed, diagnostics);
            for pattern in &row.runtime_pack_name_patterns {
                for target in &targets {
                    let package_id = match target {
                        Some(rid) => substitute_runtime_identifier(pattern, rid),
                        None => pattern.clone(),
                    };

                    // Patterns without a placeholder name the same pack for every target.
                    if runtime_packs.iter().any(|p: &RuntimePack| p.package_id == package_id) {
                        continue;
                    }

                    runtime_packs.push(RuntimePack {
                        framework_name: request.name.clone(),
                        package_id,
                        package_version: runtime_framework_version.clone(),
                        runtime_identifier: target.clone(),
                        is_copy_local: row.is_copy_local(),
                    });
                }
            }
        }

        // Eagerly expanded packs are only described, never downloaded, until
        // the project names a runtime identifier.
        let runtime_identifier_requested = !self.settings.runtime_identifiers.is_empty();
        if self.settings.enable_targeting_pack_download && runtime_pack_needed && runtime_identifier_requested {
            for pack in runtime_packs.iter().filter(|p| p.runtime_identifier.is_some()) {
                let pkg = PackageToDownload {
                    id: pack.package_id.clone(),
                    version: pack.package_version.clone(),
                };
                if !packages_to_download.contains(&pkg) {
                    packages_to_download.push(pkg);
                }
            }
        }

        ResolutionResult {
            known_framework_reference: row.clone(),
            packages_to_download,
            runtime_frameworks,
            targeting_packs,
            runtime_packs,
        }
    }

    /// The runtime identifiers to produce runtime packs for. `None` stands
    /// for a pack whose identifier is bound later.
    fn runtime_pack_targets(
        &self,
        request: &FrameworkReferenceRequest,
        row: &KnownFrameworkReference,
        runtime_pack_needed: bool,
        diagnostics: &mut Vec<FxLibError>,
    ) -> Vec<Option<String>> {
        let requested = &self.settings.runtime_identifiers;
        if !requested.is_empty() {
            let mut targets = vec![];
            for rid in requested {
                if row.runtime_pack_runtime_identifiers.supports(rid) {
                    targets.push(Some(rid.clone()));
                } else if runtime_pack_needed {
                    diagnostics.push(FxLibError::UnsupportedRuntimeIdentifier {
                        name: request.name.clone(),
                        runtime_identifier: rid.clone(),
                    });
                }
            }
            return targets;
        }

        match (&row.runtime_pack_runtime_identifiers, &self.settings.any_runtime_identifier_policy) {
            (RuntimeIdentifierSet::List(rids), _) => rids.iter().cloned().map(Some).collect(),
            (RuntimeIdentifierSet::Any, AnyRuntimeIdentifierPolicy::Expand(rids)) if !rids.is_empty() => {
                rids.iter().cloned().map(Some).collect()
            }
            (RuntimeIdentifierSet::Any, _) => vec![None],
        }
    }
}

/// The runtime framework name first, then the row's own list.
fn preferred_packages(row: &KnownFrameworkReference) -> Vec<String> {
    let mut packages = vec![row.runtime_framework_name.clone()];
    for pkg in &row.package_conflict_preferred_packages {
        if !packages.iter().any(|p| unicase::eq_ascii(p.as_str(), pkg.as_str())) {
            packages.push(pkg.clone());
        }
    }
    packages
}
