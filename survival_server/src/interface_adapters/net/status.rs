use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::protocol::StatusDto;
use crate::interface_adapters::state::AppState;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // A closed stats channel means the world task is gone.
    if state.stats_rx.has_changed().is_err() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "world task stopped".to_string(),
            }),
        )
            .into_response();
    }

    let stats = state.stats_rx.borrow().clone();
    Json(StatusDto::from(stats)).into_response()
}
