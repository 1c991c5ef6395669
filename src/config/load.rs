use super::error::ConfigError;
use super::types::ApplicationConfig;
use anyhow::Context as _;
use std::path::Path;
use tracing::{debug, info};

/// Serialization format of an application file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file suffix (`.yml`, `.yaml`, `.toml`, `.tml`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "toml" | "tml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse application file contents in the given format.
///
/// # Errors
///
/// Returns the underlying YAML or TOML error.
pub fn load_config_str(content: &str, format: ConfigFormat) -> anyhow::Result<ApplicationConfig> {
    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(config)
}

/// Read and parse an application file, choosing the format by suffix.
///
/// # Errors
///
/// [`ConfigError::UnsupportedFormat`] for an unknown suffix, otherwise the
/// read or parse error with the path attached.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<ApplicationConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    debug!(path = %path.display(), format = ?format, "Loading config file");

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = load_config_str(&content, format)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    info!(
        path = %path.display(),
        name = %config.name,
        routes = config.routers.len(),
        bind = %config.server.bind_address(),
        "Config loaded"
    );
    Ok(config)
}
