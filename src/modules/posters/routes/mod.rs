use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use posters_db::{PosterPatch, PosterStore};
use posters_http::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::models::{CreatePoster, Poster, UpdatePoster};

/// Shared state for the poster handlers
#[derive(Clone)]
pub struct PostersState {
    store: Arc<dyn PosterStore>,
}

/// Poster routes, relative to the module mount point
pub fn router(store: Arc<dyn PosterStore>) -> Router {
    tracing::debug!(
        target: "posters.routes",
        backend = store.backend(),
        "registering poster routes"
    );

    Router::new()
        .route("/", get(list_posters).post(create_poster))
        .route(
            "/{id}",
            get(get_poster).put(update_poster).delete(delete_poster),
        )
        .with_state(PostersState { store })
}

async fn list_posters(State(state): State<PostersState>) -> Result<Json<Vec<Poster>>, AppError> {
    let posters = state.store.find_all().await?;
    Ok(Json(posters.into_iter().map(Poster::from).collect()))
}

async fn get_poster(
    State(state): State<PostersState>,
    Path(id): Path<String>,
) -> Result<Json<Poster>, AppError> {
    state
        .store
        .find_by_id(&id)
        .await?
        .map(|doc| Json(doc.into()))
        .ok_or_else(|| poster_not_found(&id))
}

async fn create_poster(
    State(state): State<PostersState>,
    payload: Bytes,
) -> Result<(StatusCode, Json<Poster>), AppError> {
    let body: CreatePoster = parse_body(&payload)?;

    let missing = body.missing_fields();
    if !missing.is_empty() {
        let details = missing
            .iter()
            .map(|field| json!({ "field": field, "error": "required" }))
            .collect();
        return Err(AppError::validation(
            details,
            "fields id, url and title are required",
        ));
    }

    let poster = body
        .into_poster()
        .ok_or_else(|| AppError::bad_request("incomplete poster"))?;

    state.store.insert(&poster.clone().into()).await?;
    tracing::info!(id = %poster.id, "poster created");

    Ok((StatusCode::CREATED, Json(poster)))
}

async fn update_poster(
    State(state): State<PostersState>,
    Path(id): Path<String>,
    payload: Bytes,
) -> Result<Json<Poster>, AppError> {
    let body: UpdatePoster = parse_body(&payload)?;
    let patch = PosterPatch::from(body);

    let updated = state
        .store
        .update(&id, &patch)
        .await?
        .ok_or_else(|| poster_not_found(&id))?;

    tracing::info!(id = %id, "poster updated");
    Ok(Json(updated.into()))
}

async fn delete_poster(
    State(state): State<PostersState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.store.delete(&id).await? {
        tracing::info!(id = %id, "poster deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(poster_not_found(&id))
    }
}

/// Bodies are read as JSON whatever `Content-Type` the client sent.
fn parse_body<T: DeserializeOwned>(payload: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(payload)
        .map_err(|err| AppError::bad_request(format!("invalid JSON body: {err}")))
}

fn poster_not_found(id: &str) -> AppError {
    AppError::not_found(format!("poster not found: {id}"))
}
