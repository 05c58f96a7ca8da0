//! Payroll totals, processing and editing.
//!
//! Every total is computed from the submitted component set alone, in integer
//! minor units. A record's previous totals are never read, so resubmitting
//! the same components always yields the same record.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PayrollSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Deductions, Earnings, PaymentType, PayrollKey, PayrollPeriod, PayrollRecord, PayrollStatus,
    PayrollTotals,
};
use crate::values::Money;

/// Largest working-day count accepted for one month.
pub const MAX_WORKING_DAYS: u32 = 31;

/// Values applied when a submission leaves a field out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollDefaults {
    /// Working days when none are given.
    pub working_days: u32,
    /// Payment type when none is given.
    pub payment_type: PaymentType,
    /// Largest accepted single component.
    pub max_component: Money,
}

impl PayrollDefaults {
    /// Builds defaults from payroll settings.
    pub fn from_settings(settings: &PayrollSettings) -> Self {
        Self {
            working_days: settings.default_working_days,
            payment_type: settings.default_payment_type,
            max_component: settings.max_component(),
        }
    }
}

impl Default for PayrollDefaults {
    fn default() -> Self {
        Self::from_settings(&PayrollSettings::default())
    }
}

/// A salary submission for one employee and month.
///
/// Earnings and deductions are always submitted as complete sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollInput {
    /// The employee paid.
    pub employee_id: String,
    /// The month paid for.
    #[serde(flatten)]
    pub period: PayrollPeriod,
    /// How the salary is paid out, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    /// Days worked in the period, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_days: Option<u32>,
    /// Earning components.
    #[serde(alias = "components")]
    pub earnings: Earnings,
    /// Deduction components.
    pub deductions: Deductions,
}

impl PayrollInput {
    /// The key the submission is processed under.
    pub fn key(&self) -> PayrollKey {
        PayrollKey {
            employee_id: self.employee_id.clone(),
            period: self.period,
        }
    }
}

/// Computes gross, total deductions and net pay.
///
/// Net pay is not clamped; it is negative when deductions exceed earnings.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::compute_totals;
/// use workforce_engine::models::{Deductions, Earnings};
/// use workforce_engine::values::Money;
///
/// let earnings = Earnings {
///     basic: Money::from_major(15000),
///     hra: Money::from_major(5000),
///     ..Earnings::default()
/// };
/// let deductions = Deductions {
///     pf: Money::from_major(1800),
///     tds: Money::from_major(500),
///     ..Deductions::default()
/// };
///
/// let totals = compute_totals(&earnings, &deductions);
/// assert_eq!(totals.gross_salary, Money::from_major(20000));
/// assert_eq!(totals.total_deductions, Money::from_major(2300));
/// assert_eq!(totals.net_salary, Money::from_major(17700));
/// ```
pub fn compute_totals(earnings: &Earnings, deductions: &Deductions) -> PayrollTotals {
    let gross_salary = earnings.total();
    let total_deductions = deductions.total();
    PayrollTotals {
        gross_salary,
        total_deductions,
        net_salary: gross_salary - total_deductions,
    }
}

/// Checks every component is non-negative and within `max_component`.
///
/// # Returns
///
/// `InvalidAmount` naming the first offending component, e.g.
/// `deductions.advance`.
pub fn validate_components(
    earnings: &Earnings,
    deductions: &Deductions,
    max_component: Money,
) -> EngineResult<()> {
    let named = earnings
        .components()
        .into_iter()
        .map(|(name, amount)| ("earnings", name, amount))
        .chain(
            deductions
                .components()
                .into_iter()
                .map(|(name, amount)| ("deductions", name, amount)),
        );

    for (group, name, amount) in named {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount {
                field: format!("{group}.{name}"),
                message: format!("{amount} is negative"),
            });
        }
        if amount > max_component {
            return Err(EngineError::InvalidAmount {
                field: format!("{group}.{name}"),
                message: format!("{amount} exceeds the maximum of {max_component}"),
            });
        }
    }
    Ok(())
}

fn build_record(
    record_id: Uuid,
    input: &PayrollInput,
    payment_type: PaymentType,
    working_days: u32,
    max_component: Money,
) -> EngineResult<PayrollRecord> {
    input.period.validate()?;
    if working_days > MAX_WORKING_DAYS {
        return Err(EngineError::InvalidWorkingDays {
            working_days,
            max: MAX_WORKING_DAYS,
        });
    }
    validate_components(&input.earnings, &input.deductions, max_component)?;

    let record = PayrollRecord {
        record_id,
        employee_id: input.employee_id.clone(),
        period: input.period,
        payment_type,
        working_days,
        earnings: input.earnings,
        deductions: input.deductions,
        totals: compute_totals(&input.earnings, &input.deductions),
        status: PayrollStatus::Processed,
    };

    if record.is_net_negative() {
        warn!(
            employee_id = %record.employee_id,
            period = %record.period,
            net_salary = %record.totals.net_salary,
            "Deductions exceed earnings; net pay is negative"
        );
    }
    Ok(record)
}

/// Processes a salary submission.
///
/// # Arguments
///
/// * `input` - The submission
/// * `existing` - The record currently live under the submission's key, if any
/// * `defaults` - Values for fields the submission leaves out
///
/// # Returns
///
/// A new record, or a full replacement of `existing` that keeps its id.
/// Nothing from `existing` other than the id is carried over. Fails with
/// `InvalidPeriod` or `InvalidAmount` on bad input.
pub fn process_salary(
    input: &PayrollInput,
    existing: Option<&PayrollRecord>,
    defaults: &PayrollDefaults,
) -> EngineResult<PayrollRecord> {
    let record_id = existing.map(|r| r.record_id).unwrap_or_else(Uuid::new_v4);
    let record = build_record(
        record_id,
        input,
        input.payment_type.unwrap_or(defaults.payment_type),
        input.working_days.unwrap_or(defaults.working_days),
        defaults.max_component,
    )?;

    info!(
        record_id = %record.record_id,
        employee_id = %record.employee_id,
        period = %record.period,
        replaced = existing.is_some(),
        net_salary = %record.totals.net_salary,
        "Processed salary"
    );
    Ok(record)
}

/// Edits an existing record with a new component set.
///
/// `existing` is the record found under `record_id`, if any. Payment type
/// and working days left out of `input` keep their current values; totals
/// are always recomputed from `input`.
///
/// # Errors
///
/// `RecordNotFound` when `existing` is `None` or carries another id.
pub fn edit_salary(
    existing: Option<&PayrollRecord>,
    record_id: Uuid,
    input: &PayrollInput,
    defaults: &PayrollDefaults,
) -> EngineResult<PayrollRecord> {
    let current = existing
        .filter(|r| r.record_id == record_id)
        .ok_or(EngineError::RecordNotFound { record_id })?;

    let record = build_record(
        record_id,
        input,
        input.payment_type.unwrap_or(current.payment_type),
        input.working_days.unwrap_or(current.working_days),
        defaults.max_component,
    )?;

    info!(
        record_id = %record.record_id,
        employee_id = %record.employee_id,
        period = %record.period,
        net_salary = %record.totals.net_salary,
        "Edited salary"
    );
    Ok(record)
}

/// Totals across a set of payroll records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayrollRegister {
    /// Records included.
    pub record_count: usize,
    /// Sum of gross salaries.
    pub gross_salary: Money,
    /// Sum of deductions.
    pub total_deductions: Money,
    /// Sum of net salaries.
    pub net_salary: Money,
    /// Records whose net pay is negative.
    pub negative_net_count: usize,
}

/// Sums a set of records into a register.
pub fn payroll_register(records: &[PayrollRecord]) -> PayrollRegister {
    records.iter().fold(PayrollRegister::default(), |mut register, record| {
        register.record_count += 1;
        register.gross_salary = register.gross_salary + record.totals.gross_salary;
        register.total_deductions = register.total_deductions + record.totals.total_deductions;
        register.net_salary = register.net_salary + record.totals.net_salary;
        if record.is_net_negative() {
            register.negative_net_count += 1;
        }
        register
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(earnings: Earnings, deductions: Deductions) -> PayrollInput {
        PayrollInput {
            employee_id: "E1".to_string(),
            period: PayrollPeriod::new(11, 2025).unwrap(),
            payment_type: None,
            working_days: None,
            earnings,
            deductions,
        }
    }

    fn standard_earnings() -> Earnings {
        Earnings {
            basic: Money::from_major(15000),
            hra: Money::from_major(5000),
            ..Earnings::default()
        }
    }

    fn standard_deductions() -> Deductions {
        Deductions {
            pf: Money::from_major(1800),
            tds: Money::from_major(500),
            ..Deductions::default()
        }
    }

    #[test]
    fn test_standard_totals() {
        let totals = compute_totals(&standard_earnings(), &standard_deductions());
        assert_eq!(totals.gross_salary, Money::from_major(20000));
        assert_eq!(totals.total_deductions, Money::from_major(2300));
        assert_eq!(totals.net_salary, Money::from_major(17700));
    }

    #[test]
    fn test_negative_net_is_passed_through() {
        let earnings = Earnings {
            basic: Money::from_major(10000),
            ..Earnings::default()
        };
        let deductions = Deductions {
            advance: Money::from_major(12000),
            ..Deductions::default()
        };
        let submission = input(earnings, deductions);
        let record = process_salary(&submission, None, &PayrollDefaults::default()).unwrap();

        assert_eq!(record.totals.net_salary, Money::from_major(-2000));
        assert!(record.is_net_negative());
    }

    #[test]
    fn test_fractional_amounts_sum_exactly() {
        let earnings = Earnings {
            basic: Money::from_minor(10),
            hra: Money::from_minor(20),
            ..Earnings::default()
        };
        let totals = compute_totals(&earnings, &Deductions::default());
        assert_eq!(totals.gross_salary, Money::from_minor(30));
        assert_eq!(totals.gross_salary.to_string(), "0.30");
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let record = process_salary(
            &input(standard_earnings(), standard_deductions()),
            None,
            &PayrollDefaults::default(),
        )
        .unwrap();
        assert_eq!(record.payment_type, PaymentType::Cash);
        assert_eq!(record.working_days, 26);
        assert_eq!(record.status, PayrollStatus::Processed);
    }

    #[test]
    fn test_reprocess_replaces_and_keeps_id() {
        let defaults = PayrollDefaults::default();
        let submission = input(standard_earnings(), standard_deductions());
        let first = process_salary(&submission, None, &defaults).unwrap();

        let revised = Earnings {
            basic: Money::from_major(16000),
            ..Earnings::default()
        };
        let resubmission = input(revised, Deductions::default());
        let second = process_salary(&resubmission, Some(&first), &defaults).unwrap();

        assert_eq!(second.record_id, first.record_id);
        assert_eq!(second.earnings.hra, Money::ZERO);
        assert_eq!(second.totals.net_salary, Money::from_major(16000));
    }

    #[test]
    fn test_process_then_edit_with_same_components_is_identical() {
        let defaults = PayrollDefaults::default();
        let submission = input(standard_earnings(), standard_deductions());
        let processed = process_salary(&submission, None, &defaults).unwrap();
        let edited =
            edit_salary(Some(&processed), processed.record_id, &submission, &defaults).unwrap();

        assert_eq!(edited, processed);
        assert_eq!(
            serde_json::to_string(&edited).unwrap(),
            serde_json::to_string(&processed).unwrap()
        );
    }

    #[test]
    fn test_edit_keeps_unstated_payment_type() {
        let defaults = PayrollDefaults::default();
        let mut submission = input(standard_earnings(), standard_deductions());
        submission.payment_type = Some(PaymentType::Bank);
        let processed = process_salary(&submission, None, &defaults).unwrap();

        submission.payment_type = None;
        let edited =
            edit_salary(Some(&processed), processed.record_id, &submission, &defaults).unwrap();
        assert_eq!(edited.payment_type, PaymentType::Bank);
    }

    #[test]
    fn test_edit_unknown_record_fails() {
        let record_id = Uuid::new_v4();
        let result = edit_salary(
            None,
            record_id,
            &input(standard_earnings(), standard_deductions()),
            &PayrollDefaults::default(),
        );
        assert!(matches!(
            result,
            Err(EngineError::RecordNotFound { record_id: id }) if id == record_id
        ));
    }

    #[test]
    fn test_working_days_beyond_a_month_are_rejected() {
        let defaults = PayrollDefaults::default();
        let mut submission = input(standard_earnings(), standard_deductions());
        submission.working_days = Some(400);

        let result = process_salary(&submission, None, &defaults);
        assert!(matches!(
            result,
            Err(EngineError::InvalidWorkingDays { working_days: 400, max: 31 })
        ));

        submission.working_days = Some(MAX_WORKING_DAYS);
        let processed = process_salary(&submission, None, &defaults).unwrap();

        submission.working_days = Some(32);
        let edited = edit_salary(Some(&processed), processed.record_id, &submission, &defaults);
        assert!(matches!(edited, Err(EngineError::InvalidWorkingDays { .. })));
    }

    #[test]
    fn test_negative_component_is_rejected() {
        let earnings = Earnings {
            bonus: Money::from_major(-1),
            ..Earnings::default()
        };
        let submission = input(earnings, Deductions::default());
        let result = process_salary(&submission, None, &PayrollDefaults::default());
        assert!(matches!(
            result,
            Err(EngineError::InvalidAmount { field, .. }) if field == "earnings.bonus"
        ));
    }

    #[test]
    fn test_component_above_ceiling_is_rejected() {
        let defaults = PayrollDefaults {
            max_component: Money::from_major(1000),
            ..PayrollDefaults::default()
        };
        let deductions = Deductions {
            tds: Money::from_major(1001),
            ..Deductions::default()
        };
        let result = process_salary(&input(Earnings::default(), deductions), None, &defaults);
        assert!(matches!(
            result,
            Err(EngineError::InvalidAmount { field, .. }) if field == "deductions.tds"
        ));
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let mut submission = input(standard_earnings(), standard_deductions());
        submission.period = PayrollPeriod { year: 2025, month: 13 };
        let result = process_salary(&submission, None, &PayrollDefaults::default());
        assert!(matches!(result, Err(EngineError::InvalidPeriod { month: 13, .. })));
    }

    #[test]
    fn test_input_accepts_components_alias_and_omitted_fields() {
        let json = r#"{
            "employeeId": "E7",
            "month": 3,
            "year": 2025,
            "components": {
                "basic": "12000.50", "hra": 0, "conveyance": 0,
                "medical": 0, "special": 0, "bonus": 0
            },
            "deductions": { "pf": 0, "esi": 0, "pt": 200, "tds": 0 }
        }"#;
        let parsed: PayrollInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.payment_type, None);
        assert_eq!(parsed.earnings.basic, Money::from_minor(1_200_050));
        assert_eq!(parsed.deductions.advance, Money::ZERO);
    }

    #[test]
    fn test_register_sums_records() {
        let defaults = PayrollDefaults::default();
        let submission = input(standard_earnings(), standard_deductions());
        let a = process_salary(&submission, None, &defaults).unwrap();
        let mut other = input(
            Earnings {
                basic: Money::from_major(10000),
                ..Earnings::default()
            },
            Deductions {
                advance: Money::from_major(12000),
                ..Deductions::default()
            },
        );
        other.employee_id = "E2".to_string();
        let b = process_salary(&other, None, &defaults).unwrap();

        let register = payroll_register(&[a, b]);
        assert_eq!(register.record_count, 2);
        assert_eq!(register.gross_salary, Money::from_major(30000));
        assert_eq!(register.total_deductions, Money::from_major(14300));
        assert_eq!(register.net_salary, Money::from_major(15700));
        assert_eq!(register.negative_net_count, 1);
    }
}
