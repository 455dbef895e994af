use crate::errors::AppError;
use crate::models::{DashboardSnapshot, RangeRequest};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.controller.snapshot().await;
    Html(render_index(&snapshot))
}

pub async fn get_view(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.controller.snapshot().await)
}

pub async fn select_range(
    State(state): State<AppState>,
    Json(payload): Json<RangeRequest>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let range = validate_range(&payload.range)?;
    state.controller.select_range(range).await;
    Ok(Json(state.controller.snapshot().await))
}

pub async fn select_range_form(
    State(state): State<AppState>,
    Form(payload): Form<RangeRequest>,
) -> Result<Redirect, AppError> {
    let range = validate_range(&payload.range)?;
    state.controller.select_range(range).await;
    Ok(Redirect::to("/"))
}

pub async fn toggle_stream(
    State(state): State<AppState>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    state.controller.toggle_streaming().await?;
    Ok(Json(state.controller.snapshot().await))
}

/// The page gives no feedback on a failed toggle beyond the log line the
/// controller writes; the button simply stays as it was.
pub async fn toggle_stream_form(State(state): State<AppState>) -> Redirect {
    let _ = state.controller.toggle_streaming().await;
    Redirect::to("/")
}

fn validate_range(range: &str) -> Result<&str, AppError> {
    let range = range.trim();
    if range.is_empty() {
        return Err(AppError::bad_request("range must not be empty"));
    }
    Ok(range)
}
