//! # REST API for the Sales Ranking
//!
//! Paginated leaderboard served from the ranking cache, a debounced search
//! for the dashboard's search box, and an explicit refresh.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{RankingRequest, RankingSearchRequest, RefreshRankingRequest};
use tracing::{debug, error, info};

use crate::domain::ranking_service::ANONYMOUS_CLIENT;
use crate::io::rest::extract::{PortalJson, PortalQuery};
use crate::AppState;

/// Create a router for ranking APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ranking", get(get_ranking))
        .route("/ranking/search", get(search_ranking))
        .route("/ranking/refresh", post(refresh_ranking))
}

/// One page of the leaderboard; page 1 when not given
pub async fn get_ranking(
    State(state): State<AppState>,
    PortalQuery(request): PortalQuery<RankingRequest>,
) -> impl IntoResponse {
    let page = request.page.unwrap_or(1);
    info!(
        "GET /api/ranking - view: {}, search: '{}', page: {}",
        request.view, request.search, page
    );

    match state
        .ranking_service
        .page(request.view, &request.search, page)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!("Failed to load ranking: {}", e);
            e.into_response()
        }
    }
}

/// First page for `term`, or 204 when a newer search from the same client
/// replaced this one
pub async fn search_ranking(
    State(state): State<AppState>,
    PortalQuery(request): PortalQuery<RankingSearchRequest>,
) -> impl IntoResponse {
    let client = request.client.as_deref().unwrap_or(ANONYMOUS_CLIENT);
    info!(
        "GET /api/ranking/search - view: {}, term: '{}', client: '{}'",
        request.view, request.term, client
    );

    match state
        .ranking_service
        .search(client, request.view, &request.term)
        .await
    {
        Ok(Some(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(None) => {
            debug!("Search '{}' superseded, answering 204", request.term);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to search ranking: {}", e);
            e.into_response()
        }
    }
}

pub async fn refresh_ranking(
    State(state): State<AppState>,
    PortalJson(request): PortalJson<RefreshRankingRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/ranking/refresh - view: {}, search: '{}'",
        request.view, request.search
    );

    match state
        .ranking_service
        .refresh(request.view, &request.search)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!("Failed to refresh ranking: {}", e);
            e.into_response()
        }
    }
}
