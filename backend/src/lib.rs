//! # Sales Portal Backend
//!
//! Non-UI logic of the real-estate sales portal.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, mappers)
//!     ↓
//! Domain Layer (pay periods, hierarchy, ranking, summaries, validation)
//!     ↓
//! Storage Layer (CSV tables behind async traits)
//! ```
//!
//! `initialize_backend` wires the storage, the services and the ranking
//! cache from a [`PortalConfig`]; `create_router` exposes them over HTTP.

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{http::Method, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::PortalConfig;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::hierarchy::RoleHierarchyService;
use crate::domain::pay_period::PayPeriodCalculator;
use crate::domain::ranking_cache::RankingCache;
use crate::domain::ranking_service::RankingService;
use crate::domain::search::{SearchSessions, DEFAULT_MAX_SESSIONS};
use crate::domain::summary_service::SummaryService;
use crate::domain::validation::RegistrationValidator;
use crate::io::rest::{
    pay_period_apis, peer_apis, ranking_apis, registration_apis, summary_apis,
};
use crate::storage::{
    CsvConnection, PaymentRepository, PeerRepository, RankingRepository, SummaryRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub calculator: PayPeriodCalculator,
    pub clock: Arc<dyn Clock>,
    pub hierarchy_service: RoleHierarchyService,
    pub ranking_service: RankingService,
    pub summary_service: SummaryService,
    pub registration_validator: RegistrationValidator,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &PortalConfig) -> Result<AppState> {
    info!("Setting up CSV storage in {:?}", config.data_directory);
    let connection = CsvConnection::new(&config.data_directory)?;

    build_state(config, connection, Arc::new(SystemClock))
}

/// Wire every service over an existing connection
pub fn build_state(
    config: &PortalConfig,
    connection: CsvConnection,
    clock: Arc<dyn Clock>,
) -> Result<AppState> {
    let calculator = PayPeriodCalculator::new(config.timezone()?);
    info!("Pay periods computed at UTC{}", config.timezone_offset);

    let hierarchy_service =
        RoleHierarchyService::new(Arc::new(PeerRepository::new(connection.clone())));

    let summary_service = SummaryService::new(
        Arc::new(SummaryRepository::new(connection.clone(), calculator)),
        Arc::new(PaymentRepository::new(connection.clone(), calculator)),
        calculator,
        clock.clone(),
    );

    info!(
        "Setting up ranking cache: {} entries, {}s TTL",
        config.ranking.cache_capacity, config.ranking.cache_ttl_seconds
    );
    let ranking_service = RankingService::new(
        Arc::new(RankingRepository::new(connection)),
        Arc::new(RankingCache::new(config.ranking.cache_capacity, config.cache_ttl())),
        Arc::new(SearchSessions::new(config.search_debounce(), DEFAULT_MAX_SESSIONS)),
        config.ranking.page_size,
    );

    let registration_validator = RegistrationValidator::new(config.allowed_email_domains.clone());

    Ok(AppState {
        calculator,
        clock,
        hierarchy_service,
        ranking_service,
        summary_service,
        registration_validator,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(pay_period_apis::router())
        .merge(summary_apis::router())
        .merge(peer_apis::router())
        .merge(ranking_apis::router())
        .merge(registration_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
