// src/server/mod.rs

use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use tracing::info;
use warp::{reject::Rejection, reply::Reply, Filter};

use crate::sheets::SheetSource;

pub mod handlers;
pub mod policy;

pub use handlers::ErrorResponse;
pub use policy::{CategoryPolicy, CategoryRejection};

/// Everything a request needs. Built once at startup and cloned into each
/// route; nothing in it is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub(crate) source: Arc<dyn SheetSource>,
    pub(crate) categories: Arc<CategoryPolicy>,
}

impl AppState {
    pub fn new(source: Arc<dyn SheetSource>, categories: CategoryPolicy) -> Self {
        Self {
            source,
            categories: Arc::new(categories),
        }
    }
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .and_then(handlers::health_check);

    let dashboard = warp::path!("api" / "main-dashboard")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::main_dashboard);

    let competitors = warp::path!("api" / "competitors")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::competitors);

    let category = warp::path!("api" / "category" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::category);

    let metrics = warp::path!("api" / "metrics")
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::metrics);

    let cors = warp::cors().allow_any_origin().allow_methods(vec!["GET"]);

    health
        .or(dashboard)
        .or(competitors)
        .or(category)
        .or(metrics)
        .with(cors)
        .with(warp::trace::request())
}

pub async fn serve(state: AppState, addr: SocketAddr) {
    info!("Server starting on {}", addr);
    info!("Health check: http://{}/health", addr);
    warp::serve(routes(state)).run(addr).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::{Grid, MemorySource, SheetRange};
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::Value;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    use warp::http::StatusCode;

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,visibility_dash=debug")),
            )
            .with_test_writer()
            .finish();
        // Another test may already have installed it.
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    struct Unreachable;

    #[async_trait]
    impl SheetSource for Unreachable {
        async fn values(&self, range: &SheetRange) -> Result<Grid> {
            anyhow::bail!("connect timed out fetching {}", range)
        }
    }

    fn sheet() -> MemorySource {
        MemorySource::new()
            .with_tab(
                "Main Dashboard",
                Grid::from_rows(vec![
                    vec!["Overall Mention Rate (%)"],
                    vec!["31"],
                    vec!["Competitor Name"],
                    vec!["Lowe's", "56"],
                    vec!["Home Depot", "84"],
                    vec!["CHART DATA"],
                    vec!["Lowe's", "Home Depot"],
                    vec!["38", "62"],
                ]),
            )
            .with_tab(
                "Competitors",
                Grid::from_rows(vec![
                    vec!["Competitor", "Domain"],
                    vec!["Competitor Name", "Domain"],
                    vec!["Home Depot", "homedepot.com"],
                ]),
            )
            .with_tab(
                "Metrics",
                Grid::from_rows(vec![vec!["Metric", "Value"], vec!["Clicks", "120"]]),
            )
            .with_tab(
                "Outdoor Living",
                Grid::from_rows(vec![
                    vec!["PROMPT QUESTIONS"],
                    vec!["Prompt Question"],
                    vec!["patio sets", "40", "60"],
                ]),
            )
    }

    fn state(source: impl SheetSource + 'static, allowed: &[&str]) -> AppState {
        AppState::new(Arc::new(source), CategoryPolicy::new(allowed.iter().copied()))
    }

    async fn get(state: &AppState, path: &str) -> (StatusCode, Value) {
        init_test_logging();
        let res = warp::test::request()
            .method("GET")
            .path(path)
            .reply(&routes(state.clone()))
            .await;
        let body = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
        (res.status(), body)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get(&state(Unreachable, &[]), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn serves_the_dashboard() {
        let (status, body) = get(&state(sheet(), &[]), "/api/main-dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallRate"], 31.0);
        assert_eq!(body["overallChange"], 7.0);
        assert_eq!(
            body["competitors"],
            serde_json::json!([
                { "name": "Lowe's", "rate": 56.0 },
                { "name": "Home Depot", "rate": 84.0 }
            ])
        );
        assert_eq!(
            body["chartData"],
            serde_json::json!([{ "day": "1", "user": 38.0, "competitor": 62.0 }])
        );
    }

    #[tokio::test]
    async fn serves_flat_tables() {
        let app = state(sheet(), &[]);
        let (status, body) = get(&app, "/api/competitors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "data": [{ "Competitor": "Home Depot", "Domain": "homedepot.com" }]
            })
        );

        let (status, body) = get(&app, "/api/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["Value"], "120");
    }

    #[tokio::test]
    async fn decodes_the_category_segment() {
        let (status, body) = get(&state(sheet(), &[]), "/api/category/Outdoor%20Living").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"], serde_json::json!({}));
        assert_eq!(body["competitorData"], serde_json::json!([]));
        assert_eq!(body["phrases"][0]["phrase"], "patio sets");
        assert_eq!(body["phrases"][0]["competitorVisibility"], 60.0);
    }

    #[tokio::test]
    async fn unlisted_category_never_reaches_the_reader() {
        let app = state(Unreachable, &["Kitchen"]);
        let (status, body) = get(&app, "/api/category/Metrics").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unknown category");
        assert!(body["details"].as_str().unwrap().contains("not configured"));

        let open = state(Unreachable, &[]);
        let (status, body) = get(&open, "/api/category/Metrics!A1%3AB2").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unknown category");

        let (status, body) = get(&open, "/api/category/A%21B").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unknown category");
    }

    #[tokio::test]
    async fn undecodable_category_is_a_500_error_body() {
        let (status, body) = get(&state(Unreachable, &[]), "/api/category/%FF").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let obj = body.as_object().expect("error body is an object");
        assert_eq!(obj["error"], "Invalid category name");
        assert!(obj.keys().all(|k| k == "error" || k == "details"));
    }

    #[tokio::test]
    async fn missing_category_tab_is_a_fetch_failure() {
        let (status, body) = get(&state(sheet(), &[]), "/api/category/Kitchen").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch data");
    }

    #[tokio::test]
    async fn reader_failure_is_500_everywhere() {
        let app = state(Unreachable, &[]);
        for path in [
            "/api/main-dashboard",
            "/api/competitors",
            "/api/category/Kitchen",
            "/api/metrics",
        ] {
            let (status, body) = get(&app, path).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
            let obj = body.as_object().expect("error body is an object");
            assert_eq!(obj["error"], "Failed to fetch data");
            assert!(obj["details"].as_str().unwrap().contains("connect timed out"));
            assert!(obj.keys().all(|k| k == "error" || k == "details"), "{}", path);
        }
    }

    #[tokio::test]
    async fn repeated_requests_are_byte_identical() {
        let app = state(sheet(), &[]);
        for path in ["/api/main-dashboard", "/api/competitors", "/api/metrics"] {
            let first = warp::test::request().path(path).reply(&routes(app.clone())).await;
            let second = warp::test::request().path(path).reply(&routes(app.clone())).await;
            assert_eq!(first.body(), second.body(), "{}", path);
        }
    }

    #[tokio::test]
    async fn concurrent_requests_are_independent() {
        let app = state(sheet(), &[]);
        let paths = [
            "/api/main-dashboard",
            "/api/competitors",
            "/api/category/Outdoor%20Living",
            "/api/metrics",
        ];
        let replies = futures::future::join_all(paths.iter().map(|p| get(&app, p))).await;
        assert!(replies.iter().all(|(status, _)| *status == StatusCode::OK));
    }

    #[tokio::test]
    async fn unknown_routes_are_rejected() {
        let res = warp::test::request()
            .path("/api/unknown")
            .reply(&routes(state(sheet(), &[])))
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
