use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use rocket::Request;
use serde::Serialize;
use std::io::Cursor;

use crate::models::error::ComicError;

/// JSON error envelope: `{"detail": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody<T: Serialize> {
    pub detail: T,
}

impl<T: Serialize> ErrorBody<T> {
    pub fn new(detail: T) -> Self {
        ErrorBody { detail }
    }
}

fn json_response(status: Status, body: String) -> response::Result<'static> {
    Response::build()
        .status(status)
        .header(ContentType::JSON)
        .sized_body(body.len(), Cursor::new(body))
        .ok()
}

impl<'r> Responder<'r, 'static> for ComicError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let rendered = match &self {
            ComicError::Validation(e) => {
                tracing::debug!(
                    uri = %request.uri(),
                    issues = e.issues.len(),
                    "Rejected request body"
                );
                serde_json::to_string(&ErrorBody::new(&e.issues))
                    .map(|b| (Status::UnprocessableEntity, b))
            }
            ComicError::NotFound(_) => {
                serde_json::to_string(&ErrorBody::new(self.to_string()))
                    .map(|b| (Status::NotFound, b))
            }
            ComicError::Storage(e) => {
                tracing::error!(
                    method = %request.method(),
                    uri = %request.uri(),
                    error = %e,
                    "Storage failure"
                );
                serde_json::to_string(&ErrorBody::new("Internal Server Error"))
                    .map(|b| (Status::InternalServerError, b))
            }
        };

        match rendered {
            Ok((status, body)) => json_response(status, body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode error body");
                Err(Status::InternalServerError)
            }
        }
    }
}
