// HTTP handlers.
// Route table, shared application state, and cache header helpers for the proxy endpoints.

mod readme;
mod repo;

use std::time::Duration;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, HttpResponseBuilder, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::proxy::{CacheStatus, ImagesResponse, MISSING_URL, RepoProxy, RepoSummary, Served};

pub use readme::fetch_readme_images;
pub use repo::fetch_repo;

/// Window a CDN may keep serving a stale response while revalidating.
const STALE_WHILE_REVALIDATE_SECS: u64 = 86_400;

/// Application state shared across handlers
pub struct AppState {
    pub proxy: RepoProxy,
}

/// Query string accepted by both proxy endpoints.
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

/// Register every route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .service(
                web::resource("/fetchRepo")
                    .app_data(rejecting_query(RepoSummary::failure))
                    .route(web::get().to(fetch_repo)),
            )
            .service(
                web::resource("/fetchReadmeImages")
                    .app_data(rejecting_query(ImagesResponse::failure))
                    .route(web::get().to(fetch_readme_images)),
            ),
    );
}

/// Query extractor settings that answer an undecodable query string (such as
/// a repeated `url`) with the endpoint's JSON 400 body.
fn rejecting_query<T, F>(body: F) -> web::QueryConfig
where
    T: Serialize,
    F: Fn(String) -> T + Send + Sync + 'static,
{
    web::QueryConfig::default().error_handler(move |err, _req| {
        debug!("Rejected malformed query: {}", err);
        let response = HttpResponse::BadRequest().json(body(MISSING_URL.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "folio",
        "cacheTiers": state.proxy.tier_status(),
    }))
}

/// `Cache-Control` value for a response stored with `ttl`.
pub fn cache_control(ttl: Duration) -> String {
    format!(
        "s-maxage={}, stale-while-revalidate={}",
        ttl.as_secs(),
        STALE_WHILE_REVALIDATE_SECS
    )
}

/// 200 response carrying cache disposition headers.
fn served_response<T: serde::Serialize>(served: &Served<T>) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    builder
        .insert_header(("Cache-Control", cache_control(served.ttl)))
        .insert_header(("X-Cache", served.status.as_str()));
    if let Some(age) = served.age {
        builder.insert_header(("X-Cache-Age", age.as_secs().to_string()));
    }
    builder.json(&served.body)
}

/// Header value of a test response as text.
#[cfg(test)]
pub(crate) fn header<B>(resp: &actix_web::dev::ServiceResponse<B>, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// 500 response tagged as an error.
fn error_response() -> HttpResponseBuilder {
    let mut builder = HttpResponse::InternalServerError();
    builder.insert_header(("X-Cache", CacheStatus::Error.as_str()));
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::testing::{FakeLookup, FakeSource, proxy_with};
    use actix_web::App;
    use actix_web::test as actix_test;

    #[test]
    fn test_cache_control() {
        assert_eq!(
            cache_control(Duration::from_secs(60)),
            "s-maxage=60, stale-while-revalidate=86400"
        );
    }

    #[actix_web::test]
    async fn test_health_lists_tiers() {
        let (_, proxy) = proxy_with(FakeSource::with_lookup(FakeLookup::TransportError));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(AppState { proxy }))
                .configure(configure_routes),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cacheTiers"][0]["name"], "memory");
        assert_eq!(body["cacheTiers"][0]["available"], true);
    }
}
