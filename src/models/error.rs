use serde::Serialize;
use thiserror::Error;

use crate::models::comic::ComicId;

/// One rejected field in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldIssue {
    fn at(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        FieldIssue {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::at(&["body", field], "field required", "value_error.missing")
    }

    pub fn not_a_string(field: &str) -> Self {
        Self::at(&["body", field], "str type expected", "type_error.str")
    }

    pub fn too_short(field: &str) -> Self {
        Self::at(
            &["body", field],
            "ensure this value has at least 1 characters",
            "value_error.any_str.min_length",
        )
    }

    pub fn invalid_id() -> Self {
        Self::at(&["body", "_id"], "Invalid objectid", "value_error")
    }

    pub fn not_an_object() -> Self {
        Self::at(&["body"], "value is not a valid dict", "type_error.dict")
    }

    pub fn malformed_json(msg: impl Into<String>) -> Self {
        Self::at(&["body"], msg, "value_error.jsondecode")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request validation failed on {} field(s)", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        ValidationError { issues }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("comic {0} already exists")]
    DuplicateId(ComicId),
    #[error("store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),
    #[error("comic {0} missing right after insert")]
    Vanished(ComicId),
}

#[derive(Debug, Error)]
pub enum ComicError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Comic {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}
