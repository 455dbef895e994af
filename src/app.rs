use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/range", post(handlers::select_range_form))
        .route("/stream/toggle", post(handlers::toggle_stream_form))
        .route("/api/view", get(handlers::get_view))
        .route("/api/range", post(handlers::select_range))
        .route("/api/streaming/toggle", post(handlers::toggle_stream))
        .with_state(state)
}
