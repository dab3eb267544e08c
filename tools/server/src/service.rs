//! MCP tools exposing Google Drive listing and search.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use drivemcp_common::{DriveId, Error};
use drivemcp_drive::{
    resolve_mime_type, CredentialManager, DriveClient, DriveFile, SearchCriteria,
};

use crate::render;

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_MAX_RESULTS: u32 = 50;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListFilesRequest {
    /// Number of files to return (default: 10, max 1000)
    #[schemars(description = "Number of files to return (1-1000, default 10)")]
    pub page_size: Option<u32>,

    /// Only list direct children of this folder
    #[schemars(description = "Folder ID to list files from")]
    pub folder_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchFilesRequest {
    #[schemars(description = "Text the file name must contain")]
    pub query: String,

    #[schemars(description = "Maximum number of results (1-1000, default 50)")]
    pub max_results: Option<u32>,

    /// Full MIME type or an alias such as google_sheets, google_docs, pdf, image
    #[schemars(
        description = "MIME type filter: a full type or one of google_sheets, google_docs, google_slides, pdf, image, text, folder"
    )]
    pub mime_type: Option<String>,

    #[schemars(description = "Folder ID to search within")]
    pub folder_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FileInfoRequest {
    #[schemars(description = "Google Drive file ID")]
    pub file_id: String,
}

fn parse_folder(folder_id: Option<&str>) -> drivemcp_common::Result<Option<DriveId>> {
    folder_id
        .filter(|id| !id.is_empty())
        .map(DriveId::new)
        .transpose()
}

/// Run a search, using the plain name search unless a MIME type or
/// folder narrows it.
pub async fn search(
    client: &DriveClient,
    request: &SearchFilesRequest,
) -> drivemcp_common::Result<Vec<DriveFile>> {
    if request.query.trim().is_empty() {
        return Err(Error::InvalidInput("Query cannot be empty".to_string()));
    }

    let max_results = request.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    let mime_type = request
        .mime_type
        .as_deref()
        .filter(|m| !m.is_empty())
        .map(|m| resolve_mime_type(m).to_string());
    let folder_id = parse_folder(request.folder_id.as_deref())?;

    if mime_type.is_none() && folder_id.is_none() {
        return client.search_files(&request.query, max_results).await;
    }

    client
        .search_files_advanced(&SearchCriteria {
            name_contains: Some(request.query.clone()),
            mime_type,
            folder_id,
            max_results,
        })
        .await
}

fn tool_error(e: &Error) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
}

fn tool_result(rendered: drivemcp_common::Result<String>) -> CallToolResult {
    match rendered {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            tracing::error!("Tool call failed: {}", e);
            tool_error(&e)
        }
    }
}

/// Google Drive MCP service.
#[derive(Clone)]
pub struct DriveService {
    credentials: Arc<CredentialManager>,
    api_base_url: String,
    tool_router: ToolRouter<Self>,
}

impl DriveService {
    pub fn new(credentials: Arc<CredentialManager>, api_base_url: impl Into<String>) -> Self {
        Self {
            credentials,
            api_base_url: api_base_url.into(),
            tool_router: Self::tool_router(),
        }
    }

    /// Authenticate and build a client for one tool call.
    async fn client(&self) -> drivemcp_common::Result<DriveClient> {
        let credential = self.credentials.obtain().await?;
        DriveClient::with_base_url(&credential, self.api_base_url.clone())
    }

    async fn run_list(&self, request: &ListFilesRequest) -> drivemcp_common::Result<String> {
        let folder_id = parse_folder(request.folder_id.as_deref())?;
        let client = self.client().await?;
        let files = client
            .list_files(
                request.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
                folder_id.as_ref(),
            )
            .await?;
        render::files_json(&files)
    }

    async fn run_search(&self, request: &SearchFilesRequest) -> drivemcp_common::Result<String> {
        let client = self.client().await?;
        let files = search(&client, request).await?;
        render::files_json(&files)
    }

    async fn run_info(&self, request: &FileInfoRequest) -> drivemcp_common::Result<String> {
        let file_id = DriveId::new(request.file_id.trim())?;
        let client = self.client().await?;
        match client.get_file_info(&file_id).await? {
            Some(details) => render::details_json(&details),
            None => Err(Error::NotFound(format!("No file with id {}", file_id))),
        }
    }
}

#[tool_router]
impl DriveService {
    #[tool(description = "List files in the Google Drive account, most recently modified first. Trashed files are excluded.")]
    pub async fn list_files(
        &self,
        Parameters(request): Parameters<ListFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("listing files ..");
        Ok(tool_result(self.run_list(&request).await))
    }

    #[tool(description = "Search files in the Google Drive account by name, optionally narrowed by MIME type and folder.")]
    pub async fn search_files(
        &self,
        Parameters(request): Parameters<SearchFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("searching files for {:?} ..", request.query);
        Ok(tool_result(self.run_search(&request).await))
    }

    #[tool(description = "Get detailed information about one Google Drive file, including owners and permissions.")]
    pub async fn get_file_info(
        &self,
        Parameters(request): Parameters<FileInfoRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("getting file info for {} ..", request.file_id);
        Ok(tool_result(self.run_info(&request).await))
    }
}

#[tool_handler]
impl ServerHandler for DriveService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Read-only access to a Google Drive account. Use 'list_files' for recent files, 'search_files' to find files by name, type or folder, and 'get_file_info' for owners and sharing of one file.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
