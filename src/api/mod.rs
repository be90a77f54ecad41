//! HTTP API module for the HRMS Engine.
//!
//! A thin axum surface the surrounding application uses to invoke payroll
//! calculation and analytics. The engine itself owns no persistence; every
//! endpoint works on the rows supplied in the request.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{UNVERIFIED_ATTENDANCE_WARNING, create_router};
pub use request::{AnomalyRequest, FeedbackRequest, InsightRequest, PayrollRequest, TrendRequest};
pub use response::{AnomalyResponse, ApiError, ApiErrorResponse, InsightResponse};
pub use state::AppState;
