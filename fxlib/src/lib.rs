pub mod as_str;
pub mod errors;
pub mod version;
pub mod target_framework;
pub mod runtime_identifier;
pub mod known_framework_reference;
pub mod table;
pub mod resolver;
pub mod platform_version;
pub mod runtime_config;
pub mod app_config;
pub mod tool_manifest;
pub mod configuration;

pub mod prelude {
    pub use crate::as_str::*;
    pub use crate::errors::*;
    pub use crate::version::*;
    pub use crate::target_framework::*;
    pub use crate::runtime_identifier::*;
    pub use crate::known_framework_reference::*;
    pub use crate::table::*;
    pub use crate::resolver::*;
    pub use crate::platform_version::*;
    pub use crate::runtime_config::*;
    pub use crate::app_config::*;
    pub use crate::tool_manifest::*;
    pub use crate::configuration::*;
}

pub use prelude::*;

#[cfg(test)]
mod test_helpers;
