//! Installer manifest (`installer.toml`).
//!
//! The manifest names the application, carries the post-install command
//! lists for both platform families and optionally lists registry keys to
//! provision on Windows. The copy found in the bundle directory at build time
//! is embedded into the binary; `--manifest` replaces it at run time.

use std::path::{Component, Path};

use serde::Deserialize;

use crate::bundle;
use crate::error::ConfigError;
use crate::platform::PlatformKind;

/// Top‑level manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallerConfig {
    /// Directory, service and shortcut name
    pub application_name: String,
    #[serde(default)]
    pub commands: CommandTemplates,
    /// Keys provisioned under `HKEY_LOCAL_MACHINE` (Windows only)
    #[serde(default)]
    pub registry: Vec<RegistryKeySpec>,
}

/// Post-install commands, one ordered list per platform family
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandTemplates {
    #[serde(default)]
    pub posix: Vec<String>,
    #[serde(default)]
    pub windows: Vec<String>,
}

impl CommandTemplates {
    pub fn for_kind(&self, kind: PlatformKind) -> &[String] {
        match kind {
            PlatformKind::Posix => &self.posix,
            PlatformKind::Windows => &self.windows,
        }
    }
}

/// One registry key and the values written under it
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryKeySpec {
    /// Sub-key path below `HKEY_LOCAL_MACHINE`
    pub key: String,
    #[serde(default)]
    pub values: Vec<RegistryValue>,
}

/// A named registry value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryValue {
    pub name: String,
    pub data: RegistryData,
}

/// Registry payload. Anything other than a string or a 32-bit unsigned
/// integer is rejected while the manifest is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "toml::Value")]
pub enum RegistryData {
    /// Written as `REG_EXPAND_SZ`
    ExpandString(String),
    /// Written as `REG_DWORD`
    Dword(u32),
}

impl RegistryValue {
    pub fn string(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: RegistryData::ExpandString(data.into()),
        }
    }

    pub fn dword(name: impl Into<String>, data: u32) -> Self {
        Self {
            name: name.into(),
            data: RegistryData::Dword(data),
        }
    }
}

impl TryFrom<toml::Value> for RegistryData {
    type Error = ConfigError;

    fn try_from(value: toml::Value) -> Result<Self, Self::Error> {
        match value {
            toml::Value::String(s) => Ok(Self::ExpandString(s)),
            toml::Value::Integer(i) => u32::try_from(i)
                .map(Self::Dword)
                .map_err(|_| ConfigError::UnsupportedRegistryData(format!("integer {i}"))),
            other => Err(ConfigError::UnsupportedRegistryData(other.type_str().to_string())),
        }
    }
}

impl InstallerConfig {
    /// Parse and validate manifest text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the manifest from a file on disk
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// The manifest embedded at build time
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(bundle::embedded_manifest())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.application_name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyApplicationName);
        }

        if name != self.application_name {
            return Err(ConfigError::InvalidApplicationName(self.application_name.clone()));
        }

        // Joined onto system directories, so it must stay a single component.
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
            _ => Err(ConfigError::InvalidApplicationName(self.application_name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let config = InstallerConfig::from_toml(
            r#"
            application_name = "demo"

            [commands]
            posix = ["echo one", "echo two"]
            windows = ["echo win"]

            [[registry]]
            key = 'SOFTWARE\demo'
            values = [
              { name = "Home", data = '%ProgramFiles%\demo' },
              { name = "Level", data = 7 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.application_name, "demo");
        assert_eq!(config.commands.for_kind(PlatformKind::Posix), ["echo one", "echo two"]);
        assert_eq!(config.commands.for_kind(PlatformKind::Windows), ["echo win"]);
        assert_eq!(
            config.registry[0].values,
            vec![
                RegistryValue::string("Home", r"%ProgramFiles%\demo"),
                RegistryValue::dword("Level", 7),
            ]
        );
    }

    #[test]
    fn commands_and_registry_default_to_empty() {
        let config = InstallerConfig::from_toml(r#"application_name = "demo""#).unwrap();
        assert!(config.commands.posix.is_empty());
        assert!(config.commands.windows.is_empty());
        assert!(config.registry.is_empty());
    }

    #[test]
    fn rejects_unsupported_registry_payloads() {
        for data in ["true", "1.5", "-1", "4294967296", "[1, 2]"] {
            let text = format!(
                "application_name = \"demo\"\n[[registry]]\nkey = 'K'\nvalues = [{{ name = \"V\", data = {data} }}]\n"
            );
            assert!(
                InstallerConfig::from_toml(&text).is_err(),
                "payload {data} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_application_names_that_escape_the_target_directory() {
        for name in ["", "  ", "a/b", r"a\b", "..", "/abs"] {
            let text = format!("application_name = {name:?}");
            assert!(InstallerConfig::from_toml(&text).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn rejects_application_names_with_surrounding_whitespace() {
        for name in [" demo ", "demo ", "\tdemo"] {
            let text = format!("application_name = {name:?}");
            assert!(
                matches!(
                    InstallerConfig::from_toml(&text),
                    Err(ConfigError::InvalidApplicationName(n)) if n == name
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn embedded_manifest_is_valid() {
        let config = InstallerConfig::embedded().unwrap();
        assert!(!config.application_name.is_empty());
    }
}
