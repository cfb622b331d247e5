use rocket::http::Status;
use rocket::serde::json::{self, Json, Value};
use rocket::{Request, State};

use crate::models::comic::Comic;
use crate::models::error::{ComicError, FieldIssue, ValidationError};
use crate::services::comic_service::ComicService;
use crate::utils::response::ErrorBody;

// Undecodable bodies are reported like any other validation failure.
fn into_payload(body: Result<Json<Value>, json::Error<'_>>) -> Result<Value, ComicError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(e) => Err(ValidationError::new(vec![FieldIssue::malformed_json(e.to_string())]).into()),
    }
}

#[post("/", data = "<body>")]
pub async fn create_comic(
    comic_service: &State<ComicService>,
    body: Result<Json<Value>, json::Error<'_>>,
) -> Result<(Status, Json<Comic>), ComicError> {
    let payload = into_payload(body)?;
    let comic = comic_service.create_comic(&payload).await?;
    tracing::info!(id = %comic.id, "Created comic");
    Ok((Status::Created, Json(comic)))
}

#[get("/")]
pub async fn list_comics(
    comic_service: &State<ComicService>,
) -> Result<Json<Vec<Comic>>, ComicError> {
    Ok(Json(comic_service.list_comics().await?))
}

#[get("/<id>")]
pub async fn get_comic(
    comic_service: &State<ComicService>,
    id: &str,
) -> Result<Json<Comic>, ComicError> {
    Ok(Json(comic_service.get_comic(id).await?))
}

#[put("/<id>", data = "<body>")]
pub async fn update_comic(
    comic_service: &State<ComicService>,
    id: &str,
    body: Result<Json<Value>, json::Error<'_>>,
) -> Result<Json<Comic>, ComicError> {
    let payload = into_payload(body)?;
    Ok(Json(comic_service.update_comic(id, &payload).await?))
}

#[delete("/<id>")]
pub async fn delete_comic(
    comic_service: &State<ComicService>,
    id: &str,
) -> Result<Status, ComicError> {
    comic_service.delete_comic(id).await?;
    tracing::info!(%id, "Deleted comic");
    Ok(Status::NoContent)
}

/// Keeps framework-generated errors (unknown routes, bad methods) in the same
/// `{"detail": ...}` shape as handler errors.
#[catch(default)]
pub fn default_catcher(
    status: Status,
    _request: &Request<'_>,
) -> (Status, Json<ErrorBody<&'static str>>) {
    (status, Json(ErrorBody::new(status.reason_lossy())))
}
