//! Uptime handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::mailer::Mailer,
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// How long the mailer has been accepting forms
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UptimeResponse {
    /// When the server started
    pub started_at: DateTime<Utc>,

    /// Seconds since `started_at`
    #[schema(example = 123)]
    pub uptime: i64,
}

/// Get the uptime of the application
#[utoipa::path(
    get,
    operation_id = "uptime",
    tag = "System",
    path = "/api/v1/uptime",
    responses(
        (status = StatusCode::OK, description = "Uptime response", body = UptimeResponse),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
) -> Result<Json<UptimeResponse>, ApiError> {
    let uptime = (Utc::now() - state.start_time).num_seconds();

    Ok(Json(UptimeResponse {
        started_at: state.start_time,
        uptime,
    }))
}
