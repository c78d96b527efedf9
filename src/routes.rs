use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{MovieFields, MovieFilter, MoviePatch, NameFields},
};

type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match crate::db::ping(state.catalog.db()).await {
        Ok(()) => state
            .json
            .respond(StatusCode::OK, &json!({"status": "ok"}))
            .unwrap_or_else(|err| err.into_response()),
        Err(err) => {
            tracing::warn!(error = %err, "storage ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response()
        },
    }
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<MovieFilter>, QueryRejection>,
) -> AppResult<Response> {
    let Query(filter) = filter?;
    let movies = state.catalog.list_movies(filter).await?;
    state.json.respond(StatusCode::OK, &movies)
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: JsonBody<MovieFields>,
) -> AppResult<Response> {
    let Json(fields) = body?;
    let id = state.catalog.create_movie(fields).await?;
    state.json.respond(StatusCode::CREATED, &format!("Movie with id {id} created"))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let movie = state.catalog.get_movie(id).await?.ok_or_else(|| AppError::not_found("Movie", id))?;
    state.json.respond(StatusCode::OK, &movie)
}

pub async fn replace_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody<MovieFields>,
) -> AppResult<Response> {
    let Json(fields) = body?;
    state.catalog.replace_movie(id, fields).await?;
    state.json.respond(StatusCode::NO_CONTENT, &format!("Movie with id {id} updated"))
}

pub async fn patch_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody<MoviePatch>,
) -> AppResult<Response> {
    let Json(patch) = body?;
    state.catalog.patch_movie(id, patch).await?;
    state.json.respond(StatusCode::NO_CONTENT, &format!("Movie with id {id} partially updated"))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    state.catalog.delete_movie(id).await?;
    state.json.respond(StatusCode::NO_CONTENT, &format!("Movie with id {id} deleted"))
}

pub async fn list_directors(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let directors = state.catalog.list_directors().await?;
    state.json.respond(StatusCode::OK, &directors)
}

pub async fn create_director(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NameFields>,
) -> AppResult<Response> {
    let Json(fields) = body?;
    let id = state.catalog.create_director(fields.name).await?;
    state.json.respond(StatusCode::CREATED, &format!("Director with id {id} created"))
}

pub async fn get_director(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let director =
        state.catalog.get_director(id).await?.ok_or_else(|| AppError::not_found("Director", id))?;
    state.json.respond(StatusCode::OK, &director)
}

pub async fn update_director(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody<NameFields>,
) -> AppResult<Response> {
    let Json(fields) = body?;
    state.catalog.rename_director(id, fields.name).await?;
    state.json.respond(StatusCode::NO_CONTENT, &format!("Director with id {id} updated"))
}

pub async fn delete_director(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    state.catalog.delete_director(id).await?;
    state.json.respond(StatusCode::NO_CONTENT, &format!("Director with id {id} deleted"))
}

pub async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let genres = state.catalog.list_genres().await?;
    state.json.respond(StatusCode::OK, &genres)
}

pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NameFields>,
) -> AppResult<Response> {
    let Json(fields) = body?;
    let id = state.catalog.create_genre(fields.name).await?;
    state.json.respond(StatusCode::CREATED, &format!("Genre with id {id} created"))
}

pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let genre = state.catalog.get_genre(id).await?.ok_or_else(|| AppError::not_found("Genre", id))?;
    state.json.respond(StatusCode::OK, &genre)
}

pub async fn update_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody<NameFields>,
) -> AppResult<Response> {
    let Json(fields) = body?;
    state.catalog.rename_genre(id, fields.name).await?;
    state.json.respond(StatusCode::NO_CONTENT, &format!("Genre with id {id} updated"))
}

pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    state.catalog.delete_genre(id).await?;
    state.json.respond(StatusCode::NO_CONTENT, &format!("Genre with id {id} deleted"))
}
