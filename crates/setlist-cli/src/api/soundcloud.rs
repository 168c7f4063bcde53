//! SoundCloud metadata endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use setlist_soundcloud::{MetadataRecord, PlaylistRecord, SearchTrack};

use super::error::{ApiError, ApiResult};
use super::AppState;

const TRACK_NOT_FOUND: &str = "Track not found or unavailable";
const PLAYLIST_NOT_FOUND: &str = "Playlist not found or unavailable";

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "load_tracks")]
    pub load_tracks: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// POST /soundcloud/metadata
pub async fn track_metadata(
    State(state): State<AppState>,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> ApiResult<Json<MetadataRecord>> {
    let Json(request) = payload?;
    let url = request.url.unwrap_or_default();

    let record = state
        .resolver
        .resolve_track(&url)
        .await
        .map_err(|e| ApiError::from_metadata(e, TRACK_NOT_FOUND))?;

    Ok(Json(record))
}

/// POST /soundcloud/playlist
pub async fn playlist_metadata(
    State(state): State<AppState>,
    payload: Result<Json<PlaylistRequest>, JsonRejection>,
) -> ApiResult<Json<PlaylistRecord>> {
    let Json(request) = payload?;
    let url = request.url.unwrap_or_default();

    let playlist = state
        .resolver
        .resolve_playlist(&url, request.load_tracks.unwrap_or(true))
        .await
        .map_err(|e| ApiError::from_metadata(e, PLAYLIST_NOT_FOUND))?;

    Ok(Json(playlist))
}

/// POST /soundcloud/search
pub async fn search_tracks(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<SearchTrack>>> {
    let Json(request) = payload?;
    let query = request.query.unwrap_or_default();
    let limit = request.limit.map(|l| l.max(0) as usize);

    let tracks = state
        .resolver
        .search(&query, limit)
        .await
        .map_err(|e| ApiError::from_metadata(e, TRACK_NOT_FOUND))?;

    Ok(Json(tracks))
}

/// Metadata routes, also mounted under the `/api/soundcloud` names the web
/// frontend uses
pub fn soundcloud_routes() -> Router<AppState> {
    Router::new()
        .route("/soundcloud/metadata", post(track_metadata))
        .route("/soundcloud/playlist", post(playlist_metadata))
        .route("/soundcloud/search", post(search_tracks))
        .route("/api/soundcloud/track", post(track_metadata))
        .route("/api/soundcloud/playlist", post(playlist_metadata))
        .route("/api/soundcloud/search", post(search_tracks))
}
