//! Common utilities and types shared across the drivemcp crates.
//!
//! This module provides the error taxonomy and the small value types that
//! both the Drive client and the MCP server depend on.

pub mod error;
pub mod format;
pub mod types;

pub use error::{Error, Result};
pub use format::format_file_size;
pub use types::DriveId;
