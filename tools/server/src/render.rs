//! Rendering of Drive metadata for tool results and terminal output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use drivemcp_common::{format_file_size, Error, Result};
use drivemcp_drive::{DriveFile, DriveFileDetails, Owner, Permission};

/// The fields of a file returned to tool callers.
#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: Option<u64>,
    pub size_display: String,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    pub parents: Vec<String>,
    pub web_view_link: Option<String>,
}

impl From<&DriveFile> for FileSummary {
    fn from(file: &DriveFile) -> Self {
        let size = file.size_bytes();
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size,
            size_display: size.map(format_file_size).unwrap_or_else(|| "N/A".to_string()),
            created_time: file.created_time,
            modified_time: file.modified_time,
            parents: file.parents.clone(),
            web_view_link: file.web_view_link.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OwnerSummary<'a> {
    display_name: Option<&'a str>,
    email_address: Option<&'a str>,
    me: bool,
}

impl<'a> From<&'a Owner> for OwnerSummary<'a> {
    fn from(owner: &'a Owner) -> Self {
        Self {
            display_name: owner.display_name.as_deref(),
            email_address: owner.email_address.as_deref(),
            me: owner.me,
        }
    }
}

#[derive(Debug, Serialize)]
struct PermissionSummary<'a> {
    id: Option<&'a str>,
    #[serde(rename = "type")]
    kind: Option<&'a str>,
    role: Option<&'a str>,
    email_address: Option<&'a str>,
}

impl<'a> From<&'a Permission> for PermissionSummary<'a> {
    fn from(permission: &'a Permission) -> Self {
        Self {
            id: permission.id.as_deref(),
            kind: permission.kind.as_deref(),
            role: permission.role.as_deref(),
            email_address: permission.email_address.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetailsSummary<'a> {
    #[serde(flatten)]
    file: FileSummary,
    owners: Vec<OwnerSummary<'a>>,
    permissions: Vec<PermissionSummary<'a>>,
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::Serialization(format!("Failed to render result: {}", e)))
}

/// Render a list of files as a JSON array.
pub fn files_json(files: &[DriveFile]) -> Result<String> {
    let summaries: Vec<FileSummary> = files.iter().map(FileSummary::from).collect();
    to_pretty_json(&summaries)
}

/// Render one file with owners and permissions as a JSON object.
pub fn details_json(details: &DriveFileDetails) -> Result<String> {
    to_pretty_json(&DetailsSummary {
        file: FileSummary::from(&details.file),
        owners: details.owners.iter().map(OwnerSummary::from).collect(),
        permissions: details.permissions.iter().map(PermissionSummary::from).collect(),
    })
}

/// One terminal line per file: `- name (mime) - Size: 1.5 KB`.
pub fn file_line(file: &DriveFile) -> String {
    format!(
        "- {} ({}) - Size: {}",
        file.name,
        file.mime_type,
        file.display_size()
    )
}
