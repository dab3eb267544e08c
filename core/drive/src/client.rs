//! Google Drive API client.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use drivemcp_common::{format_file_size, DriveId, Error, Result};

use crate::credentials::Credential;
use crate::query::{Query, FOLDER_MIME_TYPE};

/// Google Drive API base URL.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Largest page the files.list endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Field mask for list and search responses.
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, size, createdTime, modifiedTime, parents, webViewLink, trashed)";
/// Field mask for single-file fetches.
const DETAIL_FIELDS: &str = "id, name, mimeType, size, createdTime, modifiedTime, parents, webViewLink, trashed, owners, permissions";

/// Most recently modified first.
const ORDER_MODIFIED_DESC: &str = "modifiedTime desc";

/// Google Drive file metadata from API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID.
    pub id: String,
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// File size in bytes (only for files with binary content).
    #[serde(default)]
    pub size: Option<String>,
    /// Created time.
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    /// Modified time.
    #[serde(default)]
    pub modified_time: Option<DateTime<Utc>>,
    /// Parent folder IDs.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Link for opening the file in a browser.
    #[serde(default)]
    pub web_view_link: Option<String>,
    /// Trashed status.
    #[serde(default)]
    pub trashed: bool,
}

impl DriveFile {
    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    /// Get size as u64.
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_ref().and_then(|s| s.parse().ok())
    }

    /// Human-readable size, or `N/A` when Drive reports none.
    pub fn display_size(&self) -> String {
        self.size_bytes()
            .map(format_file_size)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Owner of a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Name shown in the Drive UI.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Owner's email address.
    #[serde(default)]
    pub email_address: Option<String>,
    /// Whether the owner is the authenticated user.
    #[serde(default)]
    pub me: bool,
}

/// A sharing permission on a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Permission id.
    #[serde(default)]
    pub id: Option<String>,
    /// Grantee type: `user`, `group`, `domain` or `anyone`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// `owner`, `writer`, `commenter`, `reader`, ...
    #[serde(default)]
    pub role: Option<String>,
    /// Grantee's email address, for `user` and `group` grants.
    #[serde(default)]
    pub email_address: Option<String>,
}

/// File metadata with ownership and sharing information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveFileDetails {
    #[serde(flatten)]
    pub file: DriveFile,
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Response from listing files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Google's JSON error envelope.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Optional predicates for an advanced search.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    /// Substring the file name must contain.
    pub name_contains: Option<String>,
    /// MIME type, or a prefix ending in `/`.
    pub mime_type: Option<String>,
    /// Folder the file must be directly inside.
    pub folder_id: Option<DriveId>,
    /// Maximum number of results.
    pub max_results: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            name_contains: None,
            mime_type: None,
            folder_id: None,
            max_results: 50,
        }
    }
}

impl SearchCriteria {
    fn query(&self) -> Query {
        let mut query = Query::not_trashed();
        if let Some(name) = self.name_contains.as_deref().filter(|n| !n.is_empty()) {
            query = query.name_contains(name);
        }
        if let Some(mime_type) = self.mime_type.as_deref().filter(|m| !m.is_empty()) {
            query = query.mime_type(mime_type);
        }
        if let Some(folder) = &self.folder_id {
            query = query.in_parents(folder);
        }
        query
    }
}

/// Google Drive API client bound to one access token.
pub struct DriveClient {
    http: Client,
    access_token: Zeroizing<String>,
    base_url: Url,
}

impl DriveClient {
    /// Create a new Drive client.
    pub fn new(credential: &Credential) -> Result<Self> {
        Self::with_base_url(credential, DRIVE_API_BASE)
    }

    /// Create a client against a non-default API root.
    ///
    /// # Errors
    /// - `Config` if `base_url` is not an absolute http(s) URL
    pub fn with_base_url(credential: &Credential, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid API base URL {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid API base URL {:?}",
                base_url.as_str()
            )));
        }

        let http = Client::builder()
            .user_agent(concat!("drivemcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::remote(None, format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            access_token: Zeroizing::new(credential.token.clone()),
            base_url,
        })
    }

    /// List non-trashed files, most recently modified first.
    ///
    /// Returns a single page of at most `page_size` files; with `folder_id`
    /// only direct children of that folder are listed.
    pub async fn list_files(
        &self,
        page_size: u32,
        folder_id: Option<&DriveId>,
    ) -> Result<Vec<DriveFile>> {
        let mut query = Query::not_trashed();
        if let Some(folder) = folder_id {
            query = query.in_parents(folder);
        }

        let files = self
            .list_page(&query, page_size, Some(ORDER_MODIFIED_DESC))
            .await?;

        if files.is_empty() {
            tracing::info!("No files found.");
        } else {
            tracing::info!("Found {} files", files.len());
        }
        log_files(&files);

        Ok(files)
    }

    /// Find non-trashed files whose name contains `term`.
    ///
    /// # Errors
    /// - `InvalidInput` if `term` is blank
    /// - `RemoteRequest` if the API call fails
    pub async fn search_files(&self, term: &str, max_results: u32) -> Result<Vec<DriveFile>> {
        if term.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Search term cannot be empty".to_string(),
            ));
        }

        let query = Query::not_trashed().name_contains(term);
        let files = self.list_page(&query, max_results, None).await?;

        if files.is_empty() {
            tracing::info!("No files found matching \"{}\"", term);
        } else {
            tracing::info!("Found {} files matching \"{}\"", files.len(), term);
        }
        log_files(&files);

        Ok(files)
    }

    /// Search with any combination of name, MIME type and folder,
    /// most recently modified first.
    ///
    /// With no predicate set this is the same request as
    /// [`list_files`](Self::list_files) with `max_results` as page size.
    pub async fn search_files_advanced(&self, criteria: &SearchCriteria) -> Result<Vec<DriveFile>> {
        let query = criteria.query();
        let files = self
            .list_page(&query, criteria.max_results, Some(ORDER_MODIFIED_DESC))
            .await?;

        tracing::info!("Advanced search found {} files", files.len());
        log_files(&files);

        Ok(files)
    }

    /// Get detailed information about one file.
    ///
    /// Returns `Ok(None)` when the file does not exist or is not visible
    /// to the authenticated user.
    pub async fn get_file_info(&self, file_id: &DriveId) -> Result<Option<DriveFileDetails>> {
        let url = self.endpoint(&["files", file_id.as_str()])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token.as_str())
            .query(&[("fields", DETAIL_FIELDS)])
            .send()
            .await
            .map_err(|e| request_failed("get file", e))?;

        match self.handle_response(response).await {
            Ok(details) => Ok(Some(details)),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND.as_u16()) => {
                tracing::info!("File {} not found", file_id);
                Ok(None)
            }
            Err(e) => {
                tracing::error!("An error occurred: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch one page of `files.list`.
    async fn list_page(
        &self,
        query: &Query,
        page_size: u32,
        order_by: Option<&str>,
    ) -> Result<Vec<DriveFile>> {
        let url = self.endpoint(&["files"])?;
        let q = query.build();
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE).to_string();

        tracing::debug!("Listing files with q={:?}", q);

        let mut request = self
            .http
            .get(url)
            .bearer_auth(self.access_token.as_str())
            .query(&[
                ("q", q.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", page_size.as_str()),
            ]);

        if let Some(order_by) = order_by {
            request = request.query(&[("orderBy", order_by)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| request_failed("list files", e))?;

        let list: FileListResponse = match self.handle_response(response).await {
            Ok(list) => list,
            Err(e) => {
                tracing::error!("An error occurred: {}", e);
                return Err(e);
            }
        };

        if list.next_page_token.is_some() {
            tracing::debug!("More results available beyond this page");
        }

        let mut files = list.files;
        files.retain(|f| {
            if f.trashed {
                tracing::debug!("Dropping trashed file {} from results", f.id);
            }
            !f.trashed
        });

        Ok(files)
    }

    /// Append path segments to the API root, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid API base URL {:?}", self.base_url.as_str())))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Handle API response with error checking.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(|e| {
                Error::remote(
                    Some(status.as_u16()),
                    format!("Failed to parse response: {}", e),
                )
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        Err(Error::remote(Some(status.as_u16()), message))
    }
}

fn request_failed(action: &str, e: reqwest::Error) -> Error {
    Error::remote(
        e.status().map(|s| s.as_u16()),
        format!("Failed to {}: {}", action, e),
    )
}

fn log_files(files: &[DriveFile]) {
    for file in files {
        tracing::debug!(
            "- {} ({}) - Size: {}",
            file.name,
            file.mime_type,
            file.display_size()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credential() -> Credential {
        Credential {
            token: "test-token".to_string(),
            refresh_token: None,
            token_uri: None,
            client_id: None,
            client_secret: None,
            scopes: vec![],
            expiry: None,
        }
    }

    fn file_json(id: &str, name: &str, trashed: bool) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "mimeType": "text/plain",
            "size": "1536",
            "createdTime": "2024-01-10T08:00:00.000Z",
            "modifiedTime": "2024-01-15T10:00:00.000Z",
            "parents": ["root"],
            "webViewLink": format!("https://drive.google.com/file/d/{}/view", id),
            "trashed": trashed
        })
    }

    async fn client_for(server: &MockServer) -> DriveClient {
        DriveClient::with_base_url(&credential(), server.uri()).unwrap()
    }

    #[test]
    fn test_drive_file_is_folder() {
        let folder: DriveFile = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "folder",
            "mimeType": FOLDER_MIME_TYPE
        }))
        .unwrap();
        assert!(folder.is_folder());
        assert_eq!(folder.size_bytes(), None);
        assert_eq!(folder.display_size(), "N/A");

        let file: DriveFile = serde_json::from_value(file_json("2", "file.txt", false)).unwrap();
        assert!(!file.is_folder());
        assert_eq!(file.size_bytes(), Some(1536));
        assert_eq!(file.display_size(), "1.5 KB");
    }

    #[tokio::test]
    async fn test_list_files_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(bearer_token("test-token"))
            .and(query_param("q", "trashed=false"))
            .and(query_param("pageSize", "10"))
            .and(query_param("orderBy", "modifiedTime desc"))
            .and(query_param("fields", LIST_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "files": [file_json("a", "notes.txt", false), file_json("b", "old.txt", false)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let files = client_for(&server).await.list_files(10, None).await.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "notes.txt");
        assert_eq!(
            files[0].web_view_link.as_deref(),
            Some("https://drive.google.com/file/d/a/view")
        );
    }

    #[tokio::test]
    async fn test_list_files_in_folder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param("q", "trashed=false and 'folder123' in parents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "files": [file_json("a", "inside.txt", false)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let folder = DriveId::new("folder123").unwrap();
        let files = client_for(&server)
            .await
            .list_files(5, Some(&folder))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_list_files_never_returns_trashed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "files": [
                    file_json("a", "kept.txt", false),
                    file_json("b", "binned.txt", true)
                ],
                "nextPageToken": "next"
            })))
            .mount(&server)
            .await;

        let files = client_for(&server).await.list_files(10, None).await.unwrap();

        assert_eq!(files.len(), 1);
        assert!(files.iter().all(|f| !f.trashed));
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param("pageSize", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})))
            .expect(1)
            .mount(&server)
            .await;

        let files = client_for(&server).await.list_files(5000, None).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_search_files_escapes_term() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param("q", "trashed=false and name contains 'O\\'Brien'"))
            .and(query_param("pageSize", "50"))
            .and(query_param_is_missing("orderBy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "files": [file_json("a", "O'Brien report", false)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let files = client_for(&server)
            .await
            .search_files("O'Brien", 50)
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].name.contains("O'Brien"));
    }

    #[tokio::test]
    async fn test_search_files_rejects_blank_term() {
        let server = MockServer::start().await;
        let result = client_for(&server).await.search_files("  ", 10).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_advanced_search_combines_predicates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param(
                "q",
                "trashed=false and name contains 'q1' and mimeType='application/vnd.google-apps.spreadsheet' and 'f1' in parents",
            ))
            .and(query_param("orderBy", "modifiedTime desc"))
            .and(query_param("pageSize", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})))
            .expect(1)
            .mount(&server)
            .await;

        let criteria = SearchCriteria {
            name_contains: Some("q1".to_string()),
            mime_type: Some("application/vnd.google-apps.spreadsheet".to_string()),
            folder_id: Some(DriveId::new("f1").unwrap()),
            max_results: 5,
        };

        let files = client_for(&server)
            .await
            .search_files_advanced(&criteria)
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_advanced_search_without_predicates_matches_list_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param("q", "trashed=false"))
            .and(query_param("pageSize", "25"))
            .and(query_param("orderBy", "modifiedTime desc"))
            .and(query_param("fields", LIST_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "files": [file_json("a", "x.txt", false)]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let listed = client.list_files(25, None).await.unwrap();
        let searched = client
            .search_files_advanced(&SearchCriteria {
                max_results: 25,
                ..Default::default()
            })
            .await
            .unwrap();

        let ids = |files: &[DriveFile]| files.iter().map(|f| f.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&listed), ids(&searched));
    }

    #[tokio::test]
    async fn test_get_file_info_details() {
        let server = MockServer::start().await;
        let mut body = file_json("abc", "plan.pdf", false);
        body["owners"] = serde_json::json!([
            {"displayName": "Ada", "emailAddress": "ada@example.com", "me": true}
        ]);
        body["permissions"] = serde_json::json!([
            {"id": "p1", "type": "user", "role": "owner", "emailAddress": "ada@example.com"}
        ]);

        Mock::given(method("GET"))
            .and(path("/files/abc"))
            .and(query_param("fields", DETAIL_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let details = client_for(&server)
            .await
            .get_file_info(&DriveId::new("abc").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(details.file.name, "plan.pdf");
        assert_eq!(details.owners[0].display_name.as_deref(), Some("Ada"));
        assert_eq!(details.permissions[0].kind.as_deref(), Some("user"));
        assert_eq!(details.permissions[0].role.as_deref(), Some("owner"));
    }

    #[tokio::test]
    async fn test_get_file_info_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": 404, "message": "File not found: missing."}
            })))
            .mount(&server)
            .await;

        let details = client_for(&server)
            .await
            .get_file_info(&DriveId::new("missing").unwrap())
            .await
            .unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_remote_failures_are_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"code": 500, "message": "Internal Error"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let id = DriveId::new("abc").unwrap();

        let results = [
            client.list_files(10, None).await.map(|_| ()),
            client.search_files("foo", 10).await.map(|_| ()),
            client
                .search_files_advanced(&SearchCriteria::default())
                .await
                .map(|_| ()),
            client.get_file_info(&id).await.map(|_| ()),
        ];

        for result in results {
            match result {
                Err(Error::RemoteRequest { status, message }) => {
                    assert_eq!(status, Some(500));
                    assert_eq!(message, "Internal Error");
                }
                other => panic!("expected RemoteRequest, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_remote_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
        drop(listener);

        let client = DriveClient::with_base_url(&credential(), uri).unwrap();
        let result = client.list_files(10, None).await;

        assert!(matches!(
            result,
            Err(Error::RemoteRequest { status: None, .. })
        ));
    }

    #[tokio::test]
    async fn test_list_not_found_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": 404, "message": "File not found: folder123."}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let folder = DriveId::new("folder123").unwrap();

        let results = [
            client.list_files(10, Some(&folder)).await,
            client.search_files("foo", 10).await,
            client
                .search_files_advanced(&SearchCriteria::default())
                .await,
        ];

        for result in results {
            match result {
                Err(Error::RemoteRequest { status, message }) => {
                    assert_eq!(status, Some(404));
                    assert_eq!(message, "File not found: folder123.");
                }
                other => panic!("expected RemoteRequest, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_endpoint_encodes_each_segment() {
        let client =
            DriveClient::with_base_url(&credential(), "https://example.com/drive/v3/").unwrap();

        let url = client.endpoint(&["files", "../../about?x#y"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/drive/v3/files/..%2F..%2Fabout%3Fx%23y"
        );

        let url = client.endpoint(&["files"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/drive/v3/files");
    }

    #[tokio::test]
    async fn test_get_file_info_requests_single_file_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/1a.b-c_D"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("1a.b-c_D", "a", false)))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            DriveClient::with_base_url(&credential(), format!("{}/drive/v3", server.uri())).unwrap();
        let details = client
            .get_file_info(&DriveId::new("1a.b-c_D").unwrap())
            .await
            .unwrap();

        assert_eq!(details.unwrap().file.id, "1a.b-c_D");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(
            DriveClient::with_base_url(&credential(), "not a url"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DriveClient::with_base_url(&credential(), "mailto:drive@example.com"),
            Err(Error::Config(_))
        ));
    }
}
