use crate::errors::{FxLibError, FxLibResult};
use crate::version::FxVersion;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::str::FromStr;

pub const NETCOREAPP: &str = ".NETCoreApp";
pub const NETSTANDARD: &str = ".NETStandard";
pub const NETFRAMEWORK: &str = ".NETFramework";

/// The platform part of a moniker such as `net5.0-windows10.0.18362`.
#[derive(Debug, Clone)]
pub struct TargetPlatform {
    pub identifier: String,
    pub version: Option<FxVersion>,
}

impl TargetPlatform {
    pub fn new<S: Into<String>>(identifier: S, version: Option<FxVersion>) -> Self {
        TargetPlatform {
            identifier: identifier.into(),
            version,
        }
    }

    pub fn is_windows(&self) -> bool {
        unicase::eq_ascii(self.identifier.as_str(), "windows")
    }
}

impl PartialEq for TargetPlatform {
    fn eq(&self, other: &Self) -> bool {
        unicase::eq_ascii(self.identifier.as_str(), other.identifier.as_str())
            && self.version == other.version
    }
}

impl Eq for TargetPlatform {}

/// A target framework: identifier, version and, for newer frameworks,
/// an optional platform qualifier.
#[derive(Debug, Clone)]
pub struct TargetFramework {
    pub identifier: String,
    pub version: FxVersion,
    pub profile: Option<String>,
    pub platform: Option<TargetPlatform>,
}

impl TargetFramework {
    pub fn new<S: Into<String>>(identifier: S, version: FxVersion) -> Self {
        TargetFramework {
            identifier: identifier.into(),
            version,
            profile: None,
            platform: None,
        }
    }

    pub fn with_platform<S: Into<String>>(mut self, identifier: S, version: Option<FxVersion>) -> Self {
        self.platform = Some(TargetPlatform::new(identifier, version));
        self
    }

    pub fn with_profile<S: Into<String>>(mut self, profile: S) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Parses either a short moniker (`netcoreapp3.0`, `net5.0-windows10.0.18362`,
    /// `net472`) or the long form (`.NETCoreApp,Version=v3.0`).
    pub fn parse(moniker: &str) -> FxLibResult<Self> {
        let moniker = moniker.trim();
        if moniker.contains(',') {
            Self::parse_long(moniker)
        } else {
            Self::parse_short(moniker)
        }
    }

    fn parse_short(moniker: &str) -> FxLibResult<Self> {
        lazy_static! {
            static ref SHORT_RE: Regex = RegexBuilder::new(
                r##"^(?P<fw>netcoreapp|netstandard|net)(?P<ver>[0-9][0-9.]*)(-(?P<plat>[a-z]+)(?P<platver>[0-9][0-9.]*)?)?$"##)
                .case_insensitive(true).build().unwrap();
        }

        let invalid = || FxLibError::InvalidTargetFramework(moniker.to_owned());
        let caps = SHORT_RE.captures(moniker).ok_or_else(invalid)?;

        let version = parse_moniker_version(&caps["ver"]).map_err(|_| invalid())?;
        let fw = caps["fw"].to_lowercase();
        let identifier = match fw.as_str() {
            "netcoreapp" => NETCOREAPP,
            "netstandard" => NETSTANDARD,
            _ if version.major() >= 5 => NETCOREAPP,
            _ => NETFRAMEWORK,
        };

        let mut tf = TargetFramework::new(identifier, version);
        if let Some(plat) = caps.name("plat") {
            let platform_version = match caps.name("platver") {
                Some(pv) => Some(FxVersion::parse(pv.as_str()).map_err(|_| invalid())?),
                None => None,
            };
            tf = tf.with_platform(plat.as_str().to_lowercase(), platform_version);
        }

        Ok(tf)
    }

    fn parse_long(moniker: &str) -> FxLibResult<Self> {
        lazy_static! {
            static ref LONG_RE: Regex = RegexBuilder::new(
                r##"^(?P<id>[.a-z][a-z0-9.]*),\s*Version=(?P<ver>v?[0-9][0-9.]*)(,\s*Profile=(?P<profile>[^,]+))?$"##)
                .case_insensitive(true).build().unwrap();
        }

        let invalid = || FxLibError::InvalidTargetFramework(moniker.to_owned());
        let caps = LONG_RE.captures(moniker).ok_or_else(invalid)?;
        let version = FxVersion::parse(&caps["ver"]).map_err(|_| invalid())?;

        let mut tf = TargetFramework::new(canonical_identifier(&caps["id"]), version);
        if let Some(profile) = caps.name("profile") {
            tf = tf.with_profile(profile.as_str().trim());
        }

        Ok(tf)
    }

    pub fn is_identifier(&self, identifier: &str) -> bool {
        unicase::eq_ascii(self.identifier.as_str(), identifier)
    }

    pub fn platform_identifier(&self) -> Option<&str> {
        self.platform.as_ref().map(|p| p.identifier.as_str())
    }

    pub fn platform_version(&self) -> Option<&FxVersion> {
        self.platform.as_ref().and_then(|p| p.version.as_ref())
    }

    /// The same framework with any platform qualifier removed.
    pub fn without_platform(&self) -> Self {
        TargetFramework {
            platform: None,
            ..self.clone()
        }
    }

    /// The `Identifier,Version=vX.Y[,Profile=P]` form used in app.config skus.
    pub fn long_name(&self) -> String {
        let mut s = format!("{},Version=v{}", self.identifier, two_part_version(&self.version));
        if let Some(ref profile) = self.profile {
            s.push_str(",Profile=");
            s.push_str(profile);
        }
        s
    }

    /// The short folder name, e.g. `netcoreapp3.0` or `net5.0-windows10.0.18362`.
    /// Unknown identifiers fall back to the long form.
    pub fn short_name(&self) -> String {
        let mut s = if self.is_identifier(NETCOREAPP) {
            if self.version.major() >= 5 {
                format!("net{}", two_part_version(&self.version))
            } else {
                format!("netcoreapp{}", two_part_version(&self.version))
            }
        } else if self.is_identifier(NETSTANDARD) {
            format!("netstandard{}", two_part_version(&self.version))
        } else if self.is_identifier(NETFRAMEWORK) {
            let mut s = format!("net{}{}", self.version.major(), self.version.minor());
            if self.version.patch() != 0 {
                s.push_str(&self.version.patch().to_string());
            }
            s
        } else {
            return self.long_name();
        };

        if let Some(ref platform) = self.platform {
            s.push('-');
            s.push_str(&platform.identifier);
            if let Some(ref v) = platform.version {
                s.push_str(&v.to_string());
            }
        }

        s
    }
}

impl PartialEq for TargetFramework {
    fn eq(&self, other: &Self) -> bool {
        self.is_identifier(&other.identifier)
            && self.version == other.version
            && self.platform == other.platform
            && match (&self.profile, &other.profile) {
                (Some(a), Some(b)) => unicase::eq_ascii(a.as_str(), b.as_str()),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for TargetFramework {}

impl FromStr for TargetFramework {
    type Err = FxLibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetFramework::parse(s)
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Dotted versions parse normally. Dotless ones ("472", "21") have one
/// digit per component.
fn parse_moniker_version(s: &str) -> FxLibResult<FxVersion> {
    if s.contains('.') {
        return FxVersion::parse(s);
    }

    let dotted = s.chars().map(|c| c.to_string()).collect::<Vec<_>>().join(".");
    FxVersion::parse(&dotted)
}

fn two_part_version(v: &FxVersion) -> String {
    if v.patch() == 0 && v.revision() == 0 {
        format!("{}.{}", v.major(), v.minor())
    } else {
        v.without_build().to_string()
    }
}

fn canonical_identifier(id: &str) -> String {
    for known in &[NETCOREAPP, NETSTANDARD, NETFRAMEWORK] {
        if unicase::eq_ascii(id, *known) {
            return (*known).to_owned();
        }
    }

    id.to_owned()
}
