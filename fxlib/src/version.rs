use crate::errors::{FxLibError, FxLibResult};
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A version as it appears in target framework monikers, package versions
/// and platform versions. Accepts between one and four numeric components
/// (missing ones are zero, so "3.0" and "3.0.0" are the same version), an
/// optional leading 'v' and an optional semver pre-release/build suffix.
#[derive(Debug, Clone)]
pub struct FxVersion {
    semver: Version,
    revision: u64,
}

impl FxVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        FxVersion {
            semver: Version::new(major, minor, patch),
            revision: 0,
        }
    }

    pub fn parse(s: &str) -> FxLibResult<Self> {
        let invalid = || FxLibError::InvalidVersion(s.to_owned());

        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let (core, suffix) = match trimmed.find(|c: char| c == '-' || c == '+') {
            Some(idx) => trimmed.split_at(idx),
            None => (trimmed, ""),
        };

        let mut parts = [0u64; 4];
        let mut count = 0;
        for component in core.split('.') {
            if count == parts.len() || component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            parts[count] = component.parse().map_err(|_| invalid())?;
            count += 1;
        }

        let semver = if suffix.is_empty() {
            Version::new(parts[0], parts[1], parts[2])
        } else {
            let text = format!("{}.{}.{}{}", parts[0], parts[1], parts[2], suffix);
            Version::parse(&text).map_err(|_| invalid())?
        };

        Ok(FxVersion { semver, revision: parts[3] })
    }

    pub fn major(&self) -> u64 {
        self.semver.major
    }

    pub fn minor(&self) -> u64 {
        self.semver.minor
    }

    pub fn patch(&self) -> u64 {
        self.semver.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pre(&self) -> &Prerelease {
        &self.semver.pre
    }

    pub fn is_prerelease(&self) -> bool {
        !self.semver.pre.is_empty()
    }

    /// The version with build metadata removed. Build metadata never takes
    /// part in comparisons, this just tidies up the display form.
    pub fn without_build(&self) -> Self {
        let mut v = self.clone();
        v.semver.build = BuildMetadata::EMPTY;
        v
    }
}

impl PartialEq for FxVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FxVersion {}

impl PartialOrd for FxVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FxVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = &self.semver;
        let b = &other.semver;
        a.major.cmp(&b.major)
            .then(a.minor.cmp(&b.minor))
            .then(a.patch.cmp(&b.patch))
            .then(self.revision.cmp(&other.revision))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

impl Hash for FxVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.semver.major.hash(state);
        self.semver.minor.hash(state);
        self.semver.patch.hash(state);
        self.revision.hash(state);
        self.semver.pre.as_str().hash(state);
    }
}

impl FromStr for FxVersion {
    type Err = FxLibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FxVersion::parse(s)
    }
}

impl fmt::Display for FxVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.semver.major, self.semver.minor, self.semver.patch)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.semver.pre.is_empty() {
            write!(f, "-{}", self.semver.pre)?;
        }
        if !self.semver.build.is_empty() {
            write!(f, "+{}", self.semver.build)?;
        }
        Ok(())
    }
}
