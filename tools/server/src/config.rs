//! Server configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use drivemcp_common::{Error, Result};
use drivemcp_drive::client::DRIVE_API_BASE;
use drivemcp_drive::CredentialConfig;

/// Runtime configuration, loadable from a JSON file.
///
/// Every field is optional in the file; missing ones take the defaults
/// below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// OAuth client-secret file, `<config_dir>/drivemcp/gcp-oauth.keys.json`
    /// by default.
    pub credentials_file: PathBuf,
    /// Token file, `<config_dir>/drivemcp/tokens.json` by default.
    pub token_file: PathBuf,
    /// OAuth scopes to request.
    pub scopes: Vec<String>,
    /// Drive API root.
    pub api_base_url: String,
    /// Open the system browser for interactive authorization.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let credentials = CredentialConfig::default();
        Self {
            credentials_file: credentials.client_secret_path,
            token_file: credentials.token_path,
            scopes: credentials.scopes,
            api_base_url: DRIVE_API_BASE.to_string(),
            open_browser: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// - `Config` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            Error::Config(format!("Invalid config file {}: {}", path.display(), e))
        })?;

        if config.scopes.is_empty() {
            return Err(Error::Config(
                "At least one OAuth scope is required".to_string(),
            ));
        }

        Ok(config)
    }

    /// Credential settings derived from this configuration.
    pub fn credential_config(&self) -> CredentialConfig {
        CredentialConfig {
            client_secret_path: self.credentials_file.clone(),
            token_path: self.token_file.clone(),
            scopes: self.scopes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert!(config.credentials_file.ends_with("drivemcp/gcp-oauth.keys.json"));
        assert!(config.token_file.ends_with("drivemcp/tokens.json"));
        assert_eq!(config.api_base_url, DRIVE_API_BASE);
        assert_eq!(config.scopes.len(), 2);
        assert!(config.open_browser);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drivemcp.json");
        std::fs::write(&path, r#"{"token_file": "/var/lib/drivemcp/tokens.json"}"#).unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.token_file, PathBuf::from("/var/lib/drivemcp/tokens.json"));
        assert_eq!(config.api_base_url, DRIVE_API_BASE);

        let credentials = config.credential_config();
        assert_eq!(credentials.token_path, config.token_file);
        assert_eq!(credentials.client_secret_path, config.credentials_file);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drivemcp.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(ServerConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"scopes": []}"#).unwrap();
        assert!(matches!(ServerConfig::load(&path), Err(Error::Config(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(ServerConfig::load(&missing), Err(Error::Config(_))));
    }
}
