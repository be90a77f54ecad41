//! Demo payroll seeding.

use tracing::info;

use crate::calculation::{BatchSummary, calculate_payroll};
use crate::config::PayrollPolicy;
use crate::error::EngineResult;
use crate::models::{PayPeriod, PayrollAdjustments};
use crate::store::{PayrollRecord, PayrollSink};

use super::generator::{FixtureGenerator, weekdays_in};

fn seed_employee<S>(
    employee_id: &str,
    period: &PayPeriod,
    working_days: u32,
    generator: &mut FixtureGenerator,
    sink: &mut S,
    policy: &PayrollPolicy,
) -> EngineResult<()>
where
    S: PayrollSink + ?Sized,
{
    let annual_ctc = generator.annual_ctc();
    let salary_structure = generator.salary_structure(employee_id, annual_ctc, period.start_date)?;
    let attendance = generator.attendance(working_days)?;
    let adjustments = PayrollAdjustments {
        bonus: generator.bonus(),
        ..PayrollAdjustments::default()
    };

    let payroll = calculate_payroll(&salary_structure, &attendance, &adjustments, policy)?;

    sink.commit(PayrollRecord {
        pay_period: *period,
        salary_structure,
        attendance,
        payroll,
    })
}

/// Generates and commits one month of payroll per employee.
///
/// Working days are the weekdays in `period`. Each employee gets a random
/// CTC, attendance and bonus from `generator`; a failure for one employee is
/// counted in the summary and seeding carries on with the next.
pub fn seed_payroll<S>(
    employee_ids: &[String],
    period: &PayPeriod,
    generator: &mut FixtureGenerator,
    sink: &mut S,
    policy: &PayrollPolicy,
) -> BatchSummary
where
    S: PayrollSink + ?Sized,
{
    let working_days = weekdays_in(period);
    let mut summary = BatchSummary::default();

    for employee_id in employee_ids {
        let outcome = seed_employee(employee_id, period, working_days, generator, sink, policy);
        summary.record(employee_id, outcome);
    }

    info!(
        start_date = %period.start_date,
        working_days,
        seeded = summary.succeeded,
        errors = summary.failed,
        "Payroll seeding completed"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;

    fn june() -> PayPeriod {
        PayPeriod::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        )
        .unwrap()
    }

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("emp_{:03}", i)).collect()
    }

    #[test]
    fn test_seeds_every_employee() {
        let mut store = InMemoryStore::new();
        let mut generator = FixtureGenerator::from_seed(11);

        let summary = seed_payroll(&ids(5), &june(), &mut generator, &mut store, &PayrollPolicy::default());

        assert_eq!(summary.succeeded, 5);
        assert_eq!(summary.failed, 0);
        for record in store.payrolls() {
            assert_eq!(record.attendance.working_days, 21);
            assert_eq!(
                record.payroll.net_pay,
                record.payroll.total_earnings - record.payroll.total_deductions
            );
        }
    }

    #[test]
    fn test_same_seed_same_payroll() {
        let mut first = InMemoryStore::new();
        let mut second = InMemoryStore::new();

        seed_payroll(&ids(4), &june(), &mut FixtureGenerator::from_seed(5), &mut first, &PayrollPolicy::default());
        seed_payroll(&ids(4), &june(), &mut FixtureGenerator::from_seed(5), &mut second, &PayrollPolicy::default());

        let net = |s: &InMemoryStore| s.payrolls().iter().map(|r| r.payroll.net_pay).collect::<Vec<_>>();
        assert_eq!(net(&first), net(&second));
    }

    #[test]
    fn test_duplicate_employee_isolated() {
        let mut store = InMemoryStore::new();
        let mut generator = FixtureGenerator::from_seed(9);
        let employees = vec!["emp_001".to_string(), "emp_001".to_string(), "emp_002".to_string()];

        let summary = seed_payroll(&employees, &june(), &mut generator, &mut store, &PayrollPolicy::default());

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].employee_id, "emp_001");
        assert_eq!(store.payrolls().len(), 2);
    }
}
