//! # REST API for Peer Visibility
//!
//! Returns the peer records the caller may see according to their role.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{VisiblePeersRequest, VisiblePeersResponse};
use tracing::{error, info};

use crate::io::rest::mappers::peer_mapper::PeerMapper;
use crate::io::rest::extract::PortalQuery;
use crate::AppState;

/// Create a router for peer APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/peers", get(get_visible_peers))
}

pub async fn get_visible_peers(
    State(state): State<AppState>,
    PortalQuery(request): PortalQuery<VisiblePeersRequest>,
) -> impl IntoResponse {
    info!(
        "GET /api/peers - role: '{}', identifier: '{}', view_as_admin: {}",
        request.role, request.identifier, request.view_as_admin
    );

    let viewer = PeerMapper::to_viewer(request);
    match state.hierarchy_service.visible_records(&viewer).await {
        Ok((scope, records)) => {
            let response = VisiblePeersResponse {
                scope: PeerMapper::scope_to_dto(scope),
                records: records.into_iter().map(PeerMapper::to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to resolve visible peers: {}", e);
            e.into_response()
        }
    }
}
