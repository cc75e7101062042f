use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{Json, Path, Query, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::core::{compute, product_keys};
use crate::error::{CalcError, FieldViolation};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldViolation>,
}

#[derive(Debug, Serialize)]
struct ProductListResponse {
    calculators: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api", get(list_handler))
        .route(
            "/api/:product",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "fincalc HTTP API listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutting down");
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn list_handler() -> Response {
    json_response(
        StatusCode::OK,
        ProductListResponse {
            calculators: product_keys().collect(),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", &[])
}

async fn calculate_get_handler(
    Path(product): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let params = query
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect::<Map<_, _>>();
    calculate(&product, &params, today())
}

async fn calculate_post_handler(
    Path(product): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(Value::Object(params))) => calculate(&product, &params, today()),
        Ok(Json(_)) => {
            let err = CalcError::invalid("body", "must be a JSON object");
            error_response(StatusCode::BAD_REQUEST, &err.to_string(), err.violations())
        }
        Err(rejection) => {
            debug!(%product, reason = %rejection.body_text(), "rejected request body");
            error_response(StatusCode::BAD_REQUEST, &rejection.body_text(), &[])
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn calculate(product: &str, params: &Map<String, Value>, today: NaiveDate) -> Response {
    match compute(product, params, today) {
        Ok(result) => {
            info!(%product, "calculated");
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            let status = status_for(&err);
            match &err {
                CalcError::Encode(_) => error!(%product, error = %err, "calculation failed"),
                CalcError::Domain { .. } => warn!(%product, error = %err, "calculation rejected"),
                _ => debug!(%product, error = %err, "calculation rejected"),
            }
            error_response(status, &err.to_string(), err.violations())
        }
    }
}

fn status_for(err: &CalcError) -> StatusCode {
    match err {
        CalcError::Validation(_) => StatusCode::BAD_REQUEST,
        CalcError::Domain { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CalcError::UnknownProduct(_) => StatusCode::NOT_FOUND,
        CalcError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str, fields: &[FieldViolation]) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            fields: fields.to_vec(),
        },
    )
}
