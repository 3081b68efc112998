// Repository summary endpoint.
// GET /api/fetchRepo?url=<repository url>

use actix_web::{HttpResponse, web};
use tracing::{debug, error};

use crate::proxy::{RepoSummary, RepoTarget};

use super::{AppState, UrlQuery, error_response, served_response};

/// GET /api/fetchRepo
///
/// Always answers 200 for degraded upstream outcomes (rate limited, scraped
/// fallback). Only bad input (400) and unrecoverable faults (500) surface.
pub async fn fetch_repo(state: web::Data<AppState>, query: web::Query<UrlQuery>) -> HttpResponse {
    let raw_url = query.url.as_deref();

    let target = match RepoTarget::from_query(raw_url) {
        Ok(target) => target,
        Err(e) => {
            debug!("Rejected repo summary request: {}", e);
            return HttpResponse::BadRequest().json(RepoSummary::failure(message(&e)));
        }
    };

    match state.proxy.repo_summary(&target).await {
        Ok(served) => {
            debug!("Repo summary {} served: {}", target.slug(), served.status.as_str());
            served_response(&served)
        }
        Err(e) => {
            error!("Repo summary for {} failed: {}", target.slug(), e);
            state.proxy.record_summary_failure(raw_url).await;
            error_response().json(RepoSummary::failure("Internal error"))
        }
    }
}

/// Client-facing text for an input error.
pub(super) fn message(err: &crate::error::FolioError) -> String {
    match err {
        crate::error::FolioError::InvalidInput(msg) => msg.clone(),
        other => other.to_string(),
    }
}
