use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};
use std::time::Instant;

/// Logs method, path, status and latency of every request.
pub struct RequestLogger;

struct RequestStart(Instant);

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        request.local_cache(|| RequestStart(Instant::now()));
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let start = request.local_cache(|| RequestStart(Instant::now()));
        let status = response.status();
        let elapsed_ms = start.0.elapsed().as_secs_f64() * 1000.0;

        if status.code >= 500 {
            tracing::warn!(
                method = %request.method(),
                uri = %request.uri(),
                status = status.code,
                elapsed_ms,
                "Request failed"
            );
        } else {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                status = status.code,
                elapsed_ms,
                "Request handled"
            );
        }
    }
}
