//! Version 1 of the JSON API

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{
    domain::communication::mailer::Mailer,
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod stoplight;
pub mod uptime;

/// Routes for the JSON API
pub fn router<M: Mailer>() -> Router<AppState<M>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler))
}
