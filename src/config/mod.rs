//! Configuration loading and management for the HRMS Engine.
//!
//! This module provides functionality to load payroll, analytics and attendance
//! policy from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use hrms_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("PF rate: {}", config.config().payroll().pf_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AnalyticsPolicy, AttendancePolicy, CaptureMode, EngineConfig, PayrollPolicy};
