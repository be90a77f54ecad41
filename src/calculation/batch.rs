//! Multi-employee payroll runs.
//!
//! Each employee is processed independently: a failure while fetching,
//! calculating or committing one employee is counted and logged, and the
//! run continues with the next employee.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PayrollPolicy;
use crate::error::EngineResult;
use crate::models::{PayPeriod, PayrollAdjustments};
use crate::store::{AttendanceSampler, PayrollRecord, PayrollSink, SalaryStructureProvider};

use super::payroll::calculate_payroll;

/// One employee that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The employee that failed.
    pub employee_id: String,
    /// Why it failed.
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Employees whose records were committed.
    pub succeeded: usize,
    /// Employees that failed.
    pub failed: usize,
    /// Details for every failure, in processing order.
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    /// Records the outcome of one item.
    pub fn record(&mut self, employee_id: &str, outcome: EngineResult<()>) {
        match outcome {
            Ok(()) => self.succeeded += 1,
            Err(err) => {
                warn!(employee_id = %employee_id, error = %err, "Employee skipped");
                self.failed += 1;
                self.failures.push(BatchFailure {
                    employee_id: employee_id.to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    /// Total employees attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

fn process_employee<P, A, S>(
    employee_id: &str,
    period: &PayPeriod,
    provider: &P,
    sampler: &A,
    sink: &mut S,
    policy: &PayrollPolicy,
) -> EngineResult<()>
where
    P: SalaryStructureProvider + ?Sized,
    A: AttendanceSampler + ?Sized,
    S: PayrollSink + ?Sized,
{
    let salary_structure = provider.salary_structure(employee_id, period.end_date)?;
    let attendance = sampler.attendance(employee_id, period)?;
    let payroll = calculate_payroll(
        &salary_structure,
        &attendance,
        &PayrollAdjustments::default(),
        policy,
    )?;

    sink.commit(PayrollRecord {
        pay_period: *period,
        salary_structure,
        attendance,
        payroll,
    })
}

/// Runs payroll for every employee in `employee_ids`.
///
/// The salary structure used is the one in force on the last day of the
/// period. Nothing is written for an employee unless the whole record is
/// ready, and the sink commits each record in one call.
pub fn run_payroll_batch<P, A, S>(
    employee_ids: &[String],
    period: &PayPeriod,
    provider: &P,
    sampler: &A,
    sink: &mut S,
    policy: &PayrollPolicy,
) -> BatchSummary
where
    P: SalaryStructureProvider + ?Sized,
    A: AttendanceSampler + ?Sized,
    S: PayrollSink + ?Sized,
{
    let mut summary = BatchSummary::default();

    for employee_id in employee_ids {
        let outcome = process_employee(employee_id, period, provider, sampler, sink, policy);
        summary.record(employee_id, outcome);
    }

    info!(
        start_date = %period.start_date,
        end_date = %period.end_date,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Payroll batch completed"
    );

    summary
}
