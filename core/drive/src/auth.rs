//! OAuth2 installed-application flow for Google Drive.

use std::path::Path;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, TokenResponse,
    TokenUrl,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use url::Url;

use drivemcp_common::{Error, Result};

use crate::credentials::Credential;

/// OAuth2 authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
/// OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Read-only access to file metadata and content.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";
/// Access to Google Sheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Lifetime assumed when the token endpoint does not report one.
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

const CALLBACK_PAGE: &str = "<html><body><h3>drivemcp authorization complete.</h3>\
<p>You may close this window.</p></body></html>";
const CALLBACK_FAILED_PAGE: &str = "<html><body><h3>drivemcp authorization failed.</h3>\
<p>Return to the terminal for details.</p></body></html>";

/// Scopes requested when none are configured.
pub fn default_scopes() -> Vec<String> {
    vec![
        DRIVE_READONLY_SCOPE.to_string(),
        SPREADSHEETS_SCOPE.to_string(),
    ]
}

/// Fully configured oauth2 client: auth URL and token URL set.
type GoogleClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// OAuth2 client registration, as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Client ID.
    pub client_id: String,
    /// Client secret. Installed apps may omit it and rely on PKCE alone.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorization endpoint.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

/// Layout of the client-secret file: the registration sits under
/// `installed` for desktop clients and under `web` for web clients.
#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<AuthConfig>,
    web: Option<AuthConfig>,
}

impl AuthConfig {
    /// Load a client registration from a client-secret JSON file.
    ///
    /// # Errors
    /// - `MissingCredentialsFile` if the file does not exist
    /// - `Serialization` if it is not a recognizable client-secret file
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingCredentialsFile(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_json(&contents)
    }

    /// Parse a client-secret document.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: ClientSecretFile = serde_json::from_str(contents)
            .map_err(|e| Error::Serialization(format!("Invalid client secret file: {}", e)))?;

        file.installed.or(file.web).ok_or_else(|| {
            Error::Serialization(
                "Client secret file has neither an 'installed' nor a 'web' section".to_string(),
            )
        })
    }

    fn oauth_client(&self) -> Result<GoogleClient> {
        let mut client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_auth_uri(
                AuthUrl::new(self.auth_uri.clone())
                    .map_err(|e| Error::InvalidInput(format!("Invalid auth URL: {}", e)))?,
            )
            .set_token_uri(
                TokenUrl::new(self.token_uri.clone())
                    .map_err(|e| Error::InvalidInput(format!("Invalid token URL: {}", e)))?,
            );

        if let Some(secret) = &self.client_secret {
            client = client.set_client_secret(ClientSecret::new(secret.clone()));
        }

        Ok(client)
    }
}

/// HTTP client for token requests. Redirects are disabled so the token
/// endpoint cannot bounce credentials elsewhere.
fn token_http_client() -> Result<oauth2::reqwest::Client> {
    oauth2::reqwest::Client::builder()
        .redirect(oauth2::reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| Error::AuthenticationFailed(format!("Failed to build HTTP client: {}", e)))
}

/// Build a credential from a token endpoint response.
fn credential_from_token(
    token: &BasicTokenResponse,
    config: &AuthConfig,
    requested_scopes: &[String],
    previous_refresh_token: Option<&str>,
) -> Credential {
    let expires_in = token
        .expires_in()
        .unwrap_or_else(|| std::time::Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS));
    let expiry = Utc::now() + Duration::from_std(expires_in).unwrap_or_else(|_| Duration::hours(1));

    let scopes = token
        .scopes()
        .map(|granted| granted.iter().map(|s| s.as_str().to_string()).collect())
        .unwrap_or_else(|| requested_scopes.to_vec());

    // Refresh responses usually omit the refresh token; keep the old one.
    let refresh_token = token
        .refresh_token()
        .map(|t| t.secret().clone())
        .or_else(|| previous_refresh_token.map(str::to_string));

    Credential {
        token: token.access_token().secret().clone(),
        refresh_token,
        token_uri: Some(config.token_uri.clone()),
        client_id: Some(config.client_id.clone()),
        client_secret: config.client_secret.clone(),
        scopes,
        expiry: Some(expiry),
    }
}

/// The network half of authorization: silent refresh and the interactive
/// consent flow.
#[async_trait]
pub trait OAuthFlow: Send + Sync {
    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// - `AuthenticationFailed` for a revoked/invalid token or network failure
    async fn refresh(
        &self,
        config: &AuthConfig,
        refresh_token: &str,
        scopes: &[String],
    ) -> Result<Credential>;

    /// Run the interactive consent flow and return fresh tokens.
    ///
    /// # Errors
    /// - `AuthenticationFailed` if the user denies access or the exchange fails
    async fn authorize(&self, config: &AuthConfig, scopes: &[String]) -> Result<Credential>;
}

/// Installed-application flow: consent in a browser, loopback redirect.
#[derive(Debug, Clone)]
pub struct InstalledAppFlow {
    open_browser: bool,
}

impl InstalledAppFlow {
    /// Create a flow that opens the system browser.
    pub fn new() -> Self {
        Self { open_browser: true }
    }

    /// Only log the authorization URL instead of opening a browser.
    pub fn without_browser() -> Self {
        Self {
            open_browser: false,
        }
    }
}

impl Default for InstalledAppFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OAuthFlow for InstalledAppFlow {
    async fn refresh(
        &self,
        config: &AuthConfig,
        refresh_token: &str,
        scopes: &[String],
    ) -> Result<Credential> {
        let client = config.oauth_client()?;
        let http = token_http_client()?;

        let token = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&http)
            .await
            .map_err(|e| Error::AuthenticationFailed(format!("Token refresh failed: {}", e)))?;

        Ok(credential_from_token(
            &token,
            config,
            scopes,
            Some(refresh_token),
        ))
    }

    async fn authorize(&self, config: &AuthConfig, scopes: &[String]) -> Result<Credential> {
        let session = AuthorizationSession::start(config, scopes).await?;

        tracing::info!(
            "Authorize drivemcp by visiting this URL: {}",
            session.authorize_url()
        );

        if self.open_browser {
            if let Err(e) = open::that_detached(session.authorize_url().as_str()) {
                tracing::warn!("Could not open a browser: {}", e);
            }
        }

        session.complete().await
    }
}

/// Query parameters Google appends to the redirect URI.
#[derive(Debug, Default, PartialEq, Eq)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Parse an HTTP request line such as `GET /?code=...&state=... HTTP/1.1`.
///
/// Returns `None` for requests that are not the OAuth callback
/// (favicon fetches, empty preconnects).
fn parse_callback_request(request_line: &str) -> Option<CallbackParams> {
    let target = request_line.split_whitespace().nth(1)?;
    let url = Url::parse(&format!("http://127.0.0.1{}", target)).ok()?;

    let mut params = CallbackParams::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => params.code = Some(value.into_owned()),
            "state" => params.state = Some(value.into_owned()),
            "error" => params.error = Some(value.into_owned()),
            _ => {}
        }
    }

    if params.code.is_none() && params.error.is_none() {
        return None;
    }
    Some(params)
}

fn http_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}

/// One pending authorization: a bound loopback listener plus the
/// URL the user has to visit.
pub struct AuthorizationSession {
    client: GoogleClient,
    config: AuthConfig,
    scopes: Vec<String>,
    listener: TcpListener,
    authorize_url: Url,
    csrf_token: CsrfToken,
    pkce_verifier: PkceCodeVerifier,
}

impl AuthorizationSession {
    /// Bind an ephemeral loopback port and build the authorization URL.
    ///
    /// # Postconditions
    /// - The URL requests offline access with forced consent, so the
    ///   response carries a refresh token
    /// - A CSRF state and a PKCE challenge are attached
    pub async fn start(config: &AuthConfig, scopes: &[String]) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        let redirect_url = format!("http://127.0.0.1:{}/", port);

        let client = config.oauth_client()?.set_redirect_uri(
            RedirectUrl::new(redirect_url)
                .map_err(|e| Error::InvalidInput(format!("Invalid redirect URL: {}", e)))?,
        );

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (authorize_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(pkce_challenge)
            .url();

        Ok(Self {
            client,
            config: config.clone(),
            scopes: scopes.to_vec(),
            listener,
            authorize_url,
            csrf_token,
            pkce_verifier,
        })
    }

    /// URL the user must open to grant access.
    pub fn authorize_url(&self) -> &Url {
        &self.authorize_url
    }

    /// Port of the loopback redirect listener.
    pub fn redirect_port(&self) -> Result<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    /// Wait for the redirect, verify it and exchange the code for tokens.
    ///
    /// # Errors
    /// - `AuthenticationFailed` if consent was denied, the state does not
    ///   match, or the code exchange fails
    pub async fn complete(self) -> Result<Credential> {
        let params = self.wait_for_callback().await?;

        if let Some(error) = params.error {
            return Err(Error::AuthenticationFailed(format!(
                "Authorization was denied: {}",
                error
            )));
        }

        if params.state.as_deref() != Some(self.csrf_token.secret().as_str()) {
            return Err(Error::AuthenticationFailed(
                "Authorization state mismatch".to_string(),
            ));
        }

        let code = params.code.ok_or_else(|| {
            Error::AuthenticationFailed("No authorization code in callback".to_string())
        })?;

        let http = token_http_client()?;
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(self.pkce_verifier)
            .request_async(&http)
            .await
            .map_err(|e| Error::AuthenticationFailed(format!("Token exchange failed: {}", e)))?;

        if token.refresh_token().is_none() {
            tracing::warn!("No refresh token received; the credential cannot be renewed silently");
        }

        Ok(credential_from_token(&token, &self.config, &self.scopes, None))
    }

    async fn wait_for_callback(&self) -> Result<CallbackParams> {
        loop {
            let (mut stream, peer) = self.listener.accept().await?;
            let (read_half, mut write_half) = stream.split();

            let mut reader = BufReader::new(read_half);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).await?;

            // Drain the headers so closing the socket does not reset it.
            let mut header = String::new();
            loop {
                header.clear();
                let read = reader.read_line(&mut header).await?;
                if read == 0 || header == "\r\n" || header == "\n" {
                    break;
                }
            }

            match parse_callback_request(&request_line) {
                Some(params) => {
                    let page = if params.code.is_some() {
                        CALLBACK_PAGE
                    } else {
                        CALLBACK_FAILED_PAGE
                    };
                    write_half
                        .write_all(http_response("200 OK", page).as_bytes())
                        .await?;
                    write_half.shutdown().await?;
                    return Ok(params);
                }
                None => {
                    tracing::debug!("Ignoring non-callback request from {}", peer);
                    let _ = write_half
                        .write_all(http_response("404 Not Found", "").as_bytes())
                        .await;
                }
            }
        }
    }
}
