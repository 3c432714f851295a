//! # Error Types
//!
//! Shared error types for the data model.

use thiserror::Error;

/// A role name that is not part of the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);
