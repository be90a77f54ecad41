//! Synthetic data for demos and tests.
//!
//! Random salary, attendance and bonus generation lives here, behind a seeded
//! RNG, and never in the production calculators.

mod generator;
mod seed;

pub use generator::{
    FIXTURE_MEDICAL_ALLOWANCE, FIXTURE_TRANSPORT_ALLOWANCE, FixtureGenerator, MAX_ANNUAL_CTC,
    MIN_ANNUAL_CTC, weekdays_in,
};
pub use seed::seed_payroll;
