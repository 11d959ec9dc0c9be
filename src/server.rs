//! HTTP front end serving the dashboard page and its JSON payload.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::aggregate::Aggregator;
use crate::dashboard::Dashboard;
use crate::error::DashboardError;
use crate::filter::DateRange;
use crate::page::render_page;
use crate::record::RentalRecord;

/// Read-only state shared by all handlers.
pub struct AppState {
    records: Vec<RentalRecord>,
    bounds: DateRange,
    aggregator: Aggregator,
}

impl AppState {
    pub fn new(records: Vec<RentalRecord>, aggregator: Aggregator) -> Result<Self, DashboardError> {
        let bounds = DateRange::observed(&records)
            .ok_or_else(|| DashboardError::EmptyDataset("nothing to serve".to_string()))?;
        Ok(AppState {
            records,
            bounds,
            aggregator,
        })
    }

    /// Resolves query parameters into a selection. Absent or blank dates
    /// fall back to the observed bounds; given dates are used unchanged.
    fn selection(&self, params: &RangeParams) -> Result<DateRange, AppError> {
        let start = parse_date(params.start.as_deref())?;
        let end = parse_date(params.end.as_deref())?;
        Ok(DateRange::resolve(start, end, self.bounds)?)
    }

    fn dashboard(&self, params: &RangeParams) -> Result<Dashboard, AppError> {
        let selection = self.selection(params)?;
        Ok(Dashboard::build(
            &self.records,
            Some(selection),
            self.aggregator,
        )?)
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid date {s:?}, expected YYYY-MM-DD"))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Dashboard(err @ DashboardError::InvalidRange { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Dashboard(err) => {
                error!(error = ?err, "Dashboard build failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// # GET /
pub async fn get_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Html<String>, AppError> {
    let dashboard = state.dashboard(&params)?;
    Ok(Html(render_page(&dashboard)?))
}

/// # GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Dashboard>, AppError> {
    debug!(?params, "Dashboard requested");
    Ok(Json(state.dashboard(&params)?))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(get_page))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves the dashboard until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Dashboard listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state() -> Arc<AppState> {
        let records = vec![
            RentalRecord {
                year: Some(2011),
                ..RentalRecord::new(day(2011, 1, 1), 10, 20)
            },
            RentalRecord {
                year: Some(2012),
                ..RentalRecord::new(day(2012, 12, 31), 30, 40)
            },
        ];
        Arc::new(AppState::new(records, Aggregator::default()).unwrap())
    }

    fn params(start: Option<&str>, end: Option<&str>) -> RangeParams {
        RangeParams {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    #[test]
    fn test_app_state_rejects_empty_dataset() {
        assert!(AppState::new(Vec::new(), Aggregator::default()).is_err());
    }

    #[test]
    fn test_selection_defaults_to_bounds() {
        let state = state();
        let full = state.selection(&params(None, Some(""))).unwrap();
        assert_eq!(full.start(), day(2011, 1, 1));
        assert_eq!(full.end(), day(2012, 12, 31));

        let wide = state.selection(&params(Some("2000-01-01"), Some("2030-01-01"))).unwrap();
        assert_eq!(wide.start(), day(2000, 1, 1));
        assert_eq!(wide.end(), day(2030, 1, 1));
    }

    #[tokio::test]
    async fn test_selection_past_the_data_is_empty() {
        let Json(outside) = get_dashboard(
            State(state()),
            Query(params(Some("2013-01-01"), Some("2013-06-01"))),
        )
        .await
        .unwrap();
        assert_eq!(outside.range.start(), day(2013, 1, 1));
        assert_eq!(outside.record_count, 0);
        assert!(outside.by_year.rows.is_empty());
        assert_eq!(outside.users.as_pair(), (0, 0));

        let Json(start_only) = get_dashboard(State(state()), Query(params(Some("2013-01-01"), None)))
            .await
            .unwrap();
        assert_eq!(start_only.record_count, 0);
        assert_eq!(start_only.range.end(), day(2013, 1, 1));
    }

    #[test]
    fn test_selection_rejects_inverted_and_garbage() {
        let state = state();
        let inverted = state.selection(&params(Some("2012-06-01"), Some("2011-06-01")));
        assert!(matches!(
            inverted,
            Err(AppError::Dashboard(DashboardError::InvalidRange { .. }))
        ));

        let garbage = state.selection(&params(Some("yesterday"), None));
        assert!(matches!(garbage, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_error_status_codes() {
        let bad = AppError::BadRequest("nope".to_string()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let invalid = AppError::from(DashboardError::InvalidRange {
            start: day(2012, 1, 2),
            end: day(2012, 1, 1),
        })
        .into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let empty = AppError::from(DashboardError::EmptyDataset("x".to_string())).into_response();
        assert_eq!(empty.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_dashboard_filters() {
        let Json(dashboard) = get_dashboard(
            State(state()),
            Query(params(Some("2012-01-01"), None)),
        )
        .await
        .unwrap();

        assert_eq!(dashboard.record_count, 1);
        assert_eq!(dashboard.users.as_pair(), (30, 40));
    }

    #[tokio::test]
    async fn test_get_page_renders_html() {
        let Html(html) = get_page(State(state()), Query(RangeParams::default()))
            .await
            .unwrap();
        assert!(html.contains("Bike Sharing Data Dashboard"));
        assert!(html.contains(r#"value="2011-01-01""#));
    }

    async fn send(uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router(state()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_router_health() {
        let (status, body) = send("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_router_dashboard_json() {
        let (status, body) = send("/api/dashboard?start=2012-01-01").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["record_count"], 1);
        assert_eq!(json["range"]["start"], "2012-01-01");
        assert_eq!(json["users"]["casual"], 30);
        assert_eq!(json["by_year"]["rows"][0]["key"], 2012);
        assert_eq!(json["by_year"]["colors"][0], "#FF0000");
    }

    #[tokio::test]
    async fn test_router_inverted_range_is_bad_request() {
        let (status, body) = send("/api/dashboard?start=2012-06-01&end=2011-06-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Invalid date range"));
    }

    #[tokio::test]
    async fn test_router_page() {
        let (status, body) = send("/?start=2011-01-01&end=2011-12-31").await;
        assert_eq!(status, StatusCode::OK);

        let html = String::from_utf8(body).unwrap();
        assert!(html.contains(r#"name="end" value="2011-12-31""#));
        assert!(html.contains("1 records in range"));
    }
}
