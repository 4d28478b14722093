// src/server/handlers.rs

use serde::Serialize;
use std::{convert::Infallible, time::Instant};
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use super::AppState;
use crate::report::Report;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "visibility-dash"
    })))
}

pub async fn main_dashboard(state: AppState) -> Result<Response, Infallible> {
    Ok(load_report(Report::MainDashboard, &state).await)
}

pub async fn competitors(state: AppState) -> Result<Response, Infallible> {
    Ok(load_report(Report::Competitors, &state).await)
}

pub async fn metrics(state: AppState) -> Result<Response, Infallible> {
    Ok(load_report(Report::Metrics, &state).await)
}

/// `raw` is the undecoded path segment.
pub async fn category(raw: String, state: AppState) -> Result<Response, Infallible> {
    let name = match urlencoding::decode(&raw) {
        Ok(name) => name.into_owned(),
        Err(e) => {
            warn!(%raw, error = %e, "category is not valid UTF-8");
            return Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid category name",
                Some(e.to_string()),
            ));
        }
    };

    if let Err(rejection) = state.categories.check(&name) {
        warn!(category = %name, %rejection, "category rejected");
        return Ok(error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unknown category",
            Some(rejection.to_string()),
        ));
    }

    Ok(load_report(Report::Category(name), &state).await)
}

async fn load_report(report: Report, state: &AppState) -> Response {
    let start = Instant::now();
    match report.load(state.source.as_ref()).await {
        Ok(body) => {
            info!(?report, elapsed = ?start.elapsed(), "served report");
            warp::reply::json(&body).into_response()
        }
        Err(e) => {
            let details = format!("{:#}", e);
            error!(?report, error = %details, "Error fetching report");
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch data",
                Some(details),
            )
        }
    }
}

fn error_reply(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = ErrorResponse {
        error: error.to_owned(),
        details,
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}
