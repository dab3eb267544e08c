//! Drive query-language filter construction.
//!
//! Every literal is escaped before interpolation, so a search term such as
//! `O'Brien` cannot terminate the string and inject extra clauses.

use std::fmt;

use drivemcp_common::DriveId;

/// MIME type of Drive folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Short names accepted in place of full MIME types.
///
/// A value ending in `/` is a prefix and matches a whole family of types.
pub const MIME_ALIASES: &[(&str, &str)] = &[
    ("google_sheets", "application/vnd.google-apps.spreadsheet"),
    ("google_docs", "application/vnd.google-apps.document"),
    ("google_slides", "application/vnd.google-apps.presentation"),
    ("pdf", "application/pdf"),
    ("image", "image/"),
    ("text", "text/plain"),
    ("folder", FOLDER_MIME_TYPE),
];

/// Map an alias from [`MIME_ALIASES`] to its MIME type; anything else is
/// returned unchanged.
pub fn resolve_mime_type(name: &str) -> &str {
    MIME_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, mime)| *mime)
        .unwrap_or(name)
}

/// Escape a value for use inside a single-quoted query literal.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A conjunction of filter clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<String>,
}

impl Query {
    /// Start a query that excludes trashed files.
    pub fn not_trashed() -> Self {
        Self {
            clauses: vec!["trashed=false".to_string()],
        }
    }

    /// Require the file name to contain `term`.
    pub fn name_contains(mut self, term: &str) -> Self {
        self.clauses
            .push(format!("name contains '{}'", escape_literal(term)));
        self
    }

    /// Require a MIME type. A trailing `/` matches by prefix.
    pub fn mime_type(mut self, mime_type: &str) -> Self {
        let clause = if mime_type.ends_with('/') {
            format!("mimeType contains '{}'", escape_literal(mime_type))
        } else {
            format!("mimeType='{}'", escape_literal(mime_type))
        };
        self.clauses.push(clause);
        self
    }

    /// Require `folder` to be among the file's parents.
    pub fn in_parents(mut self, folder: &DriveId) -> Self {
        self.clauses
            .push(format!("'{}' in parents", escape_literal(folder.as_str())));
        self
    }

    /// Render the filter string sent as the `q` parameter.
    pub fn build(&self) -> String {
        self.clauses.join(" and ")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}
