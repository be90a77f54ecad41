//! HTTP request handlers for the HRMS Engine API.
//!
//! Every handler parses its body, converts the rows into typed models, runs
//! the pure engine functions and serialises the result. Errors are mapped
//! through [`ApiErrorResponse`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analytics::{
    SentimentReport, TrendReport, analyze_feedback, analyze_trends, detect_anomalies,
    generate_insights,
};
use crate::calculation::{calculate_payroll, summarize_attendance};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendancePeriod, AuditWarning, MetricRecord, PayrollCalculation, SalaryStructure,
};

use super::request::{
    AnomalyRequest, FeedbackRequest, InsightRequest, PayrollRequest, TrendRequest,
    attendance_periods, convert_rows, feedback_records, subject_series,
};
use super::response::{AnomalyResponse, ApiError, ApiErrorResponse, InsightResponse};
use super::state::AppState;

/// Warning code for check-ins that do not match the configured capture mode.
pub const UNVERIFIED_ATTENDANCE_WARNING: &str = "UNVERIFIED_ATTENDANCE";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(payroll_handler))
        .route("/analytics/anomalies", post(anomalies_handler))
        .route("/analytics/trends", post(trends_handler))
        .route("/analytics/feedback", post(feedback_handler))
        .route("/analytics/insights", post(insights_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn accept<T>(correlation_id: Uuid, payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| rejection_response(correlation_id, rejection))
}

fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &str,
    start_time: Instant,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us = start_time.elapsed().as_micros(),
                "Request completed successfully"
            );
            json_response(StatusCode::OK, body)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

/// Handler for `POST /payroll/calculate`.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match accept(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let result = perform_payroll(request, state.config());
    if let Ok(calculation) = &result {
        info!(
            correlation_id = %correlation_id,
            employee_id = %calculation.payroll.employee_id,
            net_pay = %calculation.payroll.net_pay,
            warnings = calculation.payroll.audit_trace.warnings.len(),
            "Payroll calculated"
        );
    }
    respond(correlation_id, "payroll", start_time, result)
}

/// Converts the request, calculates payroll and stamps the result.
fn perform_payroll(request: PayrollRequest, config: &EngineConfig) -> EngineResult<PayrollCalculation> {
    let start_time = Instant::now();

    let structure = SalaryStructure::try_from(request.salary_structure)?;
    let (attendance, unverified_days) = match (request.attendance, request.attendance_days) {
        (Some(_), Some(_)) => {
            return Err(EngineError::invalid_field(
                "attendance_days",
                "give either attendance counts or daily records, not both",
            ));
        }
        (Some(row), None) => (AttendancePeriod::try_from(row)?, 0),
        (None, Some(days)) => {
            let summary = summarize_attendance(&days, config.attendance())?;
            (summary.period, summary.unverified_days)
        }
        (None, None) => return Err(EngineError::missing_field("attendance")),
    };

    let mut payroll = calculate_payroll(&structure, &attendance, &request.adjustments, config.payroll())?;

    if unverified_days > 0 {
        payroll.audit_trace.warnings.push(AuditWarning {
            code: UNVERIFIED_ATTENDANCE_WARNING.to_string(),
            message: format!(
                "{} present day(s) were not captured by an accepted method ({:?})",
                unverified_days,
                config.attendance().capture_mode
            ),
            severity: "medium".to_string(),
        });
    }

    Ok(PayrollCalculation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        duration_us: start_time.elapsed().as_micros() as u64,
        payroll,
    })
}

/// Handler for `POST /analytics/anomalies`.
async fn anomalies_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnomalyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing anomaly request");

    let request = match accept(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let result = perform_anomalies(request, state.config());
    respond(correlation_id, "anomalies", start_time, result)
}

fn perform_anomalies(request: AnomalyRequest, config: &EngineConfig) -> EngineResult<AnomalyResponse> {
    let threshold = request
        .threshold
        .unwrap_or(config.analytics().zscore_threshold);
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(EngineError::invalid_field(
            "threshold",
            format!("must be a positive number, got {}", threshold),
        ));
    }

    let records: Vec<MetricRecord> = convert_rows(request.metrics)?;
    Ok(AnomalyResponse {
        threshold,
        anomalies: detect_anomalies(&records, threshold),
    })
}

/// Handler for `POST /analytics/trends`.
async fn trends_handler(
    State(state): State<AppState>,
    payload: Result<Json<TrendRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing trend request");

    let request = match accept(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let result = perform_trends(request, state.config());
    respond(correlation_id, "trends", start_time, result)
}

fn perform_trends(request: TrendRequest, config: &EngineConfig) -> EngineResult<TrendReport> {
    let series = subject_series(&request.subject_id, request.metrics)?;
    let attendance = attendance_periods(request.attendance)?;
    Ok(analyze_trends(&series, &attendance, config.analytics()))
}

/// Handler for `POST /analytics/feedback`.
async fn feedback_handler(
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing feedback request");

    let request = match accept(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let result = perform_feedback(request);
    respond(correlation_id, "feedback", start_time, result)
}

fn perform_feedback(request: FeedbackRequest) -> EngineResult<SentimentReport> {
    let feedback = feedback_records(request.feedback)?;
    Ok(analyze_feedback(&feedback))
}

/// Handler for `POST /analytics/insights`.
async fn insights_handler(
    State(state): State<AppState>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing insight request");

    let request = match accept(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let result = perform_insights(request, state.config());
    respond(correlation_id, "insights", start_time, result)
}

fn perform_insights(request: InsightRequest, config: &EngineConfig) -> EngineResult<InsightResponse> {
    let series = subject_series(&request.subject_id, request.metrics)?;
    let attendance = attendance_periods(request.attendance)?;
    let feedback = feedback_records(request.feedback)?;

    let trends = analyze_trends(&series, &attendance, config.analytics());
    let sentiment = analyze_feedback(&feedback);
    let insights = generate_insights(&request.subject_id, &trends, &sentiment);

    Ok(InsightResponse {
        subject_id: request.subject_id,
        insights,
    })
}
