//! HTTP API

pub mod error;
pub mod service;
pub mod soundcloud;

pub use error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use setlist_soundcloud::MetadataResolver;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const UNKNOWN_BUILD: &str = "unknown";

/// Build identifiers reported by `/version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub job_id: String,
    pub commit_id: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            job_id: UNKNOWN_BUILD.to_string(),
            commit_id: UNKNOWN_BUILD.to_string(),
        }
    }
}

impl BuildInfo {
    /// Read `JOB_ID` and `COMMIT_ID`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.is_empty()).unwrap_or_else(|| UNKNOWN_BUILD.to_string());
        Self {
            job_id: read("JOB_ID"),
            commit_id: read("COMMIT_ID"),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: MetadataResolver,
    pub build: Arc<BuildInfo>,
}

impl AppState {
    pub fn new(resolver: MetadataResolver, build: BuildInfo) -> Self {
        Self {
            resolver,
            build: Arc::new(build),
        }
    }
}

/// CORS policy from the configured origins; `*` allows any origin
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build application router
pub fn build_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(soundcloud::soundcloud_routes())
        .merge(service::service_routes())
        .with_state(state)
        .layer(cors_layer(cors_allowed_origins))
}
