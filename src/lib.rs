//! HRMS Engine
//!
//! This crate provides the numeric core of an HR/payroll application: payroll
//! calculation from salary structures and attendance, z-score anomaly detection,
//! trend and feedback-sentiment analysis, and insight generation.

#![warn(missing_docs)]

pub mod analytics;
pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod store;
