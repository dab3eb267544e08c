//! Credential persistence and the obtain/refresh/authorize decision.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use zeroize::{Zeroize, ZeroizeOnDrop};

use drivemcp_common::{Error, Result};

use crate::auth::{default_scopes, AuthConfig, InstalledAppFlow, OAuthFlow};

/// Name of the token file under the default config directory.
pub const DEFAULT_TOKEN_FILE: &str = "tokens.json";
/// Name of the client-secret file under the default config directory.
pub const DEFAULT_CLIENT_SECRET_FILE: &str = "gcp-oauth.keys.json";

/// Access tokens this close to expiry are treated as expired.
const EXPIRY_BUFFER_MINUTES: i64 = 5;

/// A persisted OAuth2 credential.
///
/// The JSON layout matches Google's "authorized user" token file, so
/// tokens written by other Google client libraries can be reused.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    /// Bearer access token.
    pub token: String,
    /// Refresh token for obtaining new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token endpoint used for refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub token_uri: Option<String>,
    /// OAuth client the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub client_id: Option<String>,
    /// Secret of that client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    #[zeroize(skip)]
    pub scopes: Vec<String>,
    /// When the access token expires. `None` means unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    /// Check if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Some(expiry) => expiry < Utc::now() + Duration::minutes(EXPIRY_BUFFER_MINUTES),
            None => false,
        }
    }

    /// A credential is usable when it has a token that has not expired.
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.is_expired()
    }

    /// Whether a silent refresh can be attempted.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The OAuth client embedded in the credential, if complete.
    fn embedded_auth_config(&self) -> Option<AuthConfig> {
        let client_id = self.client_id.clone()?;
        let token_uri = self.token_uri.clone()?;
        Some(AuthConfig {
            client_id,
            client_secret: self.client_secret.clone(),
            auth_uri: crate::auth::GOOGLE_AUTH_URL.to_string(),
            token_uri,
        })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Where credentials live and what they are for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// OAuth client-secret file used to bootstrap authorization.
    pub client_secret_path: PathBuf,
    /// File the obtained token is persisted to.
    pub token_path: PathBuf,
    /// Scopes to request.
    pub scopes: Vec<String>,
}

impl CredentialConfig {
    /// Default directory for credential files: `<config_dir>/drivemcp`.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drivemcp")
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        let dir = Self::default_dir();
        Self {
            client_secret_path: dir.join(DEFAULT_CLIENT_SECRET_FILE),
            token_path: dir.join(DEFAULT_TOKEN_FILE),
            scopes: default_scopes(),
        }
    }
}

/// Which branch produced a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The persisted token was still valid.
    Cached,
    /// The persisted token was expired and silently refreshed.
    Refreshed,
    /// The user went through the consent flow.
    Interactive,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cached => "cached",
            Self::Refreshed => "refreshed",
            Self::Interactive => "interactive",
        };
        f.write_str(name)
    }
}

/// A credential together with the branch that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    /// The usable credential.
    pub credential: Credential,
    /// Which branch produced it.
    pub source: CredentialSource,
}

/// Produces usable credentials from the token file, a refresh, or the
/// interactive flow, in that order.
pub struct CredentialManager {
    config: CredentialConfig,
    flow: Arc<dyn OAuthFlow>,
    /// Serializes `resolve` so concurrent callers never start two flows.
    lock: Mutex<()>,
}

impl CredentialManager {
    /// Create a manager with a custom OAuth flow.
    pub fn new(config: CredentialConfig, flow: Arc<dyn OAuthFlow>) -> Self {
        Self {
            config,
            flow,
            lock: Mutex::new(()),
        }
    }

    /// Create a manager that uses the browser-based installed-app flow.
    pub fn with_installed_flow(config: CredentialConfig) -> Self {
        Self::new(config, Arc::new(InstalledAppFlow::new()))
    }

    /// Get the current configuration.
    pub fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Check, without network access, that credentials can be obtained at all.
    ///
    /// # Errors
    /// - `MissingCredentialsFile` when there is neither a token file nor a
    ///   client-secret file
    pub fn preflight(&self) -> Result<()> {
        if self.config.token_path.exists() || self.config.client_secret_path.exists() {
            Ok(())
        } else {
            Err(Error::MissingCredentialsFile(
                self.config.client_secret_path.clone(),
            ))
        }
    }

    /// Obtain a usable credential.
    pub async fn obtain(&self) -> Result<Credential> {
        self.resolve().await.map(|resolved| resolved.credential)
    }

    /// Obtain a usable credential and report how it was produced.
    ///
    /// # Postconditions
    /// - A refreshed or newly authorized credential has been persisted
    ///
    /// # Errors
    /// - `MissingCredentialsFile` if authorization is needed and the
    ///   client-secret file is absent
    /// - `AuthenticationFailed` if the interactive flow fails
    /// - A failed refresh is not an error: it falls back to the interactive flow
    pub async fn resolve(&self) -> Result<ResolvedCredential> {
        let _guard = self.lock.lock().await;

        if let Some(stored) = self.load_token().await {
            if stored.is_valid() {
                tracing::debug!("Using cached credentials");
                return Ok(ResolvedCredential {
                    credential: stored,
                    source: CredentialSource::Cached,
                });
            }

            if stored.is_expired() && stored.can_refresh() {
                match self.refresh(&stored).await {
                    Ok(credential) => {
                        self.save_token(&credential).await?;
                        tracing::info!("Refreshed expired access token");
                        return Ok(ResolvedCredential {
                            credential,
                            source: CredentialSource::Refreshed,
                        });
                    }
                    Err(e) => {
                        tracing::warn!("Error refreshing token: {}", e);
                    }
                }
            }
        }

        let auth_config = AuthConfig::load(&self.config.client_secret_path).await?;

        tracing::info!("No usable token, starting interactive authorization");
        let credential = self.flow.authorize(&auth_config, &self.config.scopes).await?;
        self.save_token(&credential).await?;
        tracing::info!("Successfully authenticated with Google Drive");

        Ok(ResolvedCredential {
            credential,
            source: CredentialSource::Interactive,
        })
    }

    async fn refresh(&self, stored: &Credential) -> Result<Credential> {
        let auth_config = match stored.embedded_auth_config() {
            Some(config) => config,
            None => AuthConfig::load(&self.config.client_secret_path).await?,
        };

        let refresh_token = stored
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::AuthenticationFailed("No refresh token".to_string()))?;

        let scopes = if stored.scopes.is_empty() {
            &self.config.scopes
        } else {
            &stored.scopes
        };

        self.flow.refresh(&auth_config, refresh_token, scopes).await
    }

    /// Load the persisted token. Unreadable files count as absent.
    async fn load_token(&self) -> Option<Credential> {
        let path = &self.config.token_path;
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Cannot read token file {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(credential) => Some(credential),
            Err(e) => {
                tracing::warn!("Ignoring malformed token file {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn save_token(&self, credential: &Credential) -> Result<()> {
        write_token_file(&self.config.token_path, credential).await
    }
}

async fn write_token_file(path: &Path, credential: &Credential) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_vec_pretty(credential)
        .map_err(|e| Error::Serialization(format!("Failed to serialize token: {}", e)))?;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    // `mode` only applies on creation; tighten files that already existed.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    file.write_all(&json).await?;
    file.flush().await?;

    tracing::debug!("Saved token to {}", path.display());
    Ok(())
}
