//! REST service for a single collection of comic records backed by MongoDB.
//!
//! - **`models`**: the `Comic` record, its identifier, payload validation and
//!   error types.
//! - **`services`**: the `ComicStore` persistence trait with MongoDB and
//!   in-memory implementations, and `ComicService`, which runs each request's
//!   storage calls.
//! - **`routes`**: Rocket handlers for create, list, get, update and delete.

#[macro_use]
extern crate rocket;

pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use rocket::{Build, Rocket};

use crate::services::comic_service::ComicService;
use crate::services::store::ComicStore;
use crate::utils::request_log::RequestLogger;

/// Assembles the Rocket instance around an already connected store.
pub fn build_rocket(store: Arc<dyn ComicStore>) -> Rocket<Build> {
    rocket::build()
        .attach(RequestLogger)
        .manage(ComicService::new(store))
        .mount("/", routes![
            routes::comics::create_comic,
            routes::comics::list_comics,
            routes::comics::get_comic,
            routes::comics::update_comic,
            routes::comics::delete_comic,
        ])
        .register("/", catchers![routes::comics::default_catcher])
}
