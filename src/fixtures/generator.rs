//! Seeded synthetic payroll inputs.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::calculation::round_currency;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendancePeriod, PayPeriod, SalaryStructure};

/// Smallest generated annual CTC.
pub const MIN_ANNUAL_CTC: u32 = 300_000;
/// Largest generated annual CTC.
pub const MAX_ANNUAL_CTC: u32 = 2_400_000;

/// Fixed monthly transport allowance in generated structures.
pub const FIXTURE_TRANSPORT_ALLOWANCE: Decimal = Decimal::from_parts(1600, 0, 0, false, 0);
/// Fixed monthly medical allowance in generated structures.
pub const FIXTURE_MEDICAL_ALLOWANCE: Decimal = Decimal::from_parts(1250, 0, 0, false, 0);

/// Basic salary as a share of monthly CTC (40%).
const BASIC_SHARE: Decimal = Decimal::from_parts(40, 0, 0, false, 2);
/// HRA as a share of basic salary (40%).
const HRA_SHARE: Decimal = Decimal::from_parts(40, 0, 0, false, 2);

/// Generates salary structures, attendance and bonuses for demos and tests.
///
/// All randomness comes from one seeded [`StdRng`], so the same seed and the
/// same sequence of calls always produce the same fixtures. Nothing in
/// [`crate::calculation`] depends on this type.
#[derive(Debug, Clone)]
pub struct FixtureGenerator {
    rng: StdRng,
}

impl FixtureGenerator {
    /// Creates a generator from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws an annual CTC in whole thousands.
    pub fn annual_ctc(&mut self) -> Decimal {
        let thousands = self
            .rng
            .gen_range(MIN_ANNUAL_CTC / 1000..=MAX_ANNUAL_CTC / 1000);
        Decimal::from(thousands) * Decimal::from(1000)
    }

    /// Splits an annual CTC into a monthly salary structure.
    ///
    /// Basic salary is 40% of monthly CTC, HRA 40% of basic, transport and
    /// medical allowances are fixed, and the remainder is special allowance.
    /// A CTC too small to cover the fixed allowances gets a zero special
    /// allowance.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidField`] for a negative CTC.
    pub fn salary_structure(
        &self,
        employee_id: &str,
        annual_ctc: Decimal,
        effective_from: NaiveDate,
    ) -> EngineResult<SalaryStructure> {
        if annual_ctc < Decimal::ZERO {
            return Err(EngineError::invalid_field(
                "annual_ctc",
                format!("must not be negative, got {}", annual_ctc),
            ));
        }

        let monthly = annual_ctc / Decimal::from(12);
        let basic_salary = round_currency(monthly * BASIC_SHARE);
        let hra = round_currency(basic_salary * HRA_SHARE);
        let special_allowance = round_currency(
            monthly - basic_salary - hra - FIXTURE_TRANSPORT_ALLOWANCE - FIXTURE_MEDICAL_ALLOWANCE,
        )
        .max(Decimal::ZERO);

        let structure = SalaryStructure {
            employee_id: employee_id.to_string(),
            effective_from,
            basic_salary,
            hra,
            special_allowance,
            transport_allowance: FIXTURE_TRANSPORT_ALLOWANCE,
            medical_allowance: FIXTURE_MEDICAL_ALLOWANCE,
            other_allowances: Decimal::ZERO,
        };
        structure.validate()?;
        Ok(structure)
    }

    /// Draws attendance for a month of `working_days`.
    ///
    /// Presence falls between 80% and 100% of working days; the remaining
    /// days split randomly between loss-of-pay and paid leave.
    pub fn attendance(&mut self, working_days: u32) -> EngineResult<AttendancePeriod> {
        let floor = working_days * 4 / 5;
        let present_days = self.rng.gen_range(floor..=working_days);
        let lop_days = self.rng.gen_range(0..=working_days - present_days);
        AttendancePeriod::new(working_days, present_days, lop_days)
    }

    /// Draws a bonus: one month in five carries 1,000 to 10,000 in hundreds,
    /// otherwise zero.
    pub fn bonus(&mut self) -> Decimal {
        if self.rng.gen_bool(0.2) {
            Decimal::from(self.rng.gen_range(10u32..=100) * 100)
        } else {
            Decimal::ZERO
        }
    }
}

/// Monday to Friday days within a pay period.
pub fn weekdays_in(period: &PayPeriod) -> u32 {
    period
        .start_date
        .iter_days()
        .take_while(|d| *d <= period.end_date)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}
