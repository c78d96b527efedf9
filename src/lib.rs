pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod json;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{MethodRouter, get},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::Catalog, json::JsonStyle};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub json: JsonStyle,
}

impl AppState {
    pub fn new(db: DatabaseConnection, json_indent: usize) -> Self {
        Self { catalog: Catalog::new(db), json: JsonStyle::new(json_indent) }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    let movies = get(routes::list_movies).post(routes::create_movie);
    let directors = get(routes::list_directors).post(routes::create_director);
    let genres = get(routes::list_genres).post(routes::create_genre);

    let router = Router::new().route("/health", get(routes::health));
    let router = collection(router, "/movies", movies);
    let router = collection(router, "/directors", directors);
    let router = collection(router, "/genres", genres);

    router
        .route(
            "/movies/{id}",
            get(routes::get_movie)
                .put(routes::replace_movie)
                .patch(routes::patch_movie)
                .delete(routes::delete_movie),
        )
        .route(
            "/directors/{id}",
            get(routes::get_director).put(routes::update_director).delete(routes::delete_director),
        )
        .route(
            "/genres/{id}",
            get(routes::get_genre).put(routes::update_genre).delete(routes::delete_genre),
        )
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
}

// Collections answer with and without the trailing slash.
fn collection(
    router: Router<Arc<AppState>>,
    path: &str,
    methods: MethodRouter<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    router.route(path, methods.clone()).route(&format!("{path}/"), methods)
}
