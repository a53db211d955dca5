use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FxLibError {
    // Errors from external libraries...
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("The document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    // Errors raised by us...
    #[error("'{0}' is not a valid version")]
    InvalidVersion(String),

    #[error("'{0}' is not a valid target framework")]
    InvalidTargetFramework(String),

    #[error("'{0}' is not a valid roll forward policy, expected one of Minor, LatestMinor, Major, LatestMajor, LatestPatch or Disable")]
    InvalidRollForward(String),

    #[error("Invalid tool manifest: {0}")]
    InvalidToolManifest(String),

    /// A row of the known framework reference table could not be parsed.
    /// Fatal for the whole resolution pass.
    #[error("Known framework reference '{name}' has an invalid {field} '{value}': {reason}")]
    MalformedTableRow {
        name: String,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("The framework reference '{name}' could not be resolved for target framework '{target_framework}'")]
    UnresolvedFrameworkReference {
        name: String,
        target_framework: String,
    },

    #[error("The target platform version {requested} is not supported. Supported versions are: {}", .supported.join(", "))]
    UnsupportedPlatformVersion {
        requested: String,
        supported: Vec<String>,
    },

    #[error("There is no runtime pack for '{name}' available for the runtime identifier '{runtime_identifier}'")]
    UnsupportedRuntimeIdentifier {
        name: String,
        runtime_identifier: String,
    },

    #[error("The framework reference '{name}' can only be built on Windows. Set EnableWindowsTargeting to build it on other platforms")]
    WindowsOnlyFrameworkReference {
        name: String,
    },
}

pub type FxLibResult<T> = std::result::Result<T, FxLibError>;
