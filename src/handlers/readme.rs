// README images endpoint.
// GET /api/fetchReadmeImages?url=<repository url>

use actix_web::{HttpResponse, web};
use tracing::{debug, error};

use crate::proxy::{ImagesResponse, RepoTarget};

use super::repo::message;
use super::{AppState, UrlQuery, error_response, served_response};

/// GET /api/fetchReadmeImages
pub async fn fetch_readme_images(
    state: web::Data<AppState>,
    query: web::Query<UrlQuery>,
) -> HttpResponse {
    let target = match RepoTarget::from_query(query.url.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            debug!("Rejected README images request: {}", e);
            return HttpResponse::BadRequest().json(ImagesResponse::failure(message(&e)));
        }
    };

    match state.proxy.readme_images(&target).await {
        Ok(served) => {
            debug!("README images {} served: {}", target.slug(), served.status.as_str());
            served_response(&served)
        }
        Err(e) => {
            error!("README images for {} failed: {}", target.slug(), e);
            error_response().json(ImagesResponse::failure("Internal error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::github::Repository;
    use crate::handlers::{AppState, configure_routes, header};
    use crate::proxy::testing::{FakeLookup, FakeSource, proxy_with};
    use actix_web::{App, test, web};

    const IMAGES_URI: &str = "/api/fetchReadmeImages?url=https://github.com/o/r";

    fn source_with_readme(readme: Option<&str>) -> std::sync::Arc<FakeSource> {
        let source = FakeSource::with_lookup(FakeLookup::Found(Repository {
            default_branch: Some("main".to_string()),
            ..Repository::default()
        }));
        if let Some(text) = readme {
            source.set_file("main", "README.md", text);
        }
        source
    }

    macro_rules! app_for {
        ($source:expr) => {{
            let (_, proxy) = proxy_with($source);
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState { proxy }))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_repeated_url_is_json_bad_request() {
        let app = app_for!(source_with_readme(None));

        let req = test::TestRequest::get()
            .uri("/api/fetchReadmeImages?url=https://github.com/o/r&url=https://github.com/o/s")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing url query param");
        assert_eq!(body["images"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_missing_url_is_bad_request() {
        let app = app_for!(source_with_readme(None));

        let req = test::TestRequest::get()
            .uri("/api/fetchReadmeImages")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing url query param");
        assert_eq!(body["images"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_images_then_cached() {
        let app = app_for!(source_with_readme(Some(concat!(
            "![x](img1.png)\n",
            "<img src=\"http://host/img2.png\">\n",
            "![y](img1.png)\n",
            "![z](data:image/png;base64,AAAA)",
        ))));

        let req = test::TestRequest::get().uri(IMAGES_URI).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(header(&resp, "x-cache").as_deref(), Some("MISS"));
        assert_eq!(
            header(&resp, "cache-control").as_deref(),
            Some("s-maxage=7200, stale-while-revalidate=86400")
        );
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            serde_json::json!({
                "images": [
                    "https://raw.githubusercontent.com/o/r/main/img1.png",
                    "http://host/img2.png"
                ]
            })
        );

        let req = test::TestRequest::get().uri(IMAGES_URI).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(header(&resp, "x-cache").as_deref(), Some("HIT"));
        assert_eq!(header(&resp, "x-cache-age").as_deref(), Some("0"));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["cached"], true);
        assert_eq!(body["images"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_missing_readme_is_empty() {
        let app = app_for!(source_with_readme(None));

        let req = test::TestRequest::get().uri(IMAGES_URI).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(header(&resp, "x-cache").as_deref(), Some("EMPTY"));
        assert_eq!(
            header(&resp, "cache-control").as_deref(),
            Some("s-maxage=3600, stale-while-revalidate=86400")
        );
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["images"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_metadata_failure_reports_error_status() {
        let app = app_for!(FakeSource::with_lookup(FakeLookup::RateLimited));

        let req = test::TestRequest::get().uri(IMAGES_URI).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(header(&resp, "x-cache").as_deref(), Some("ERROR"));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["images"], serde_json::json!([]));
    }
}
