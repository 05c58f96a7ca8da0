//! Payroll record model.
//!
//! A [`PayrollRecord`] is the processed salary for one employee for one
//! month. At most one record is live per [`PayrollKey`]; edits replace it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::values::Money;

/// How the salary is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// Paid in cash.
    Cash,
    /// Paid by bank transfer.
    Bank,
    /// Paid by cheque.
    Cheque,
}

/// Lifecycle status of a payroll record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayrollStatus {
    /// Totals have been computed and the record is live.
    #[default]
    Processed,
}

/// A payroll month.
///
/// Fields are ordered year first so the derived ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl PayrollPeriod {
    /// Creates a period, rejecting months outside 1-12.
    ///
    /// # Example
    ///
    /// ```
    /// use workforce_engine::models::PayrollPeriod;
    ///
    /// assert!(PayrollPeriod::new(11, 2025).is_ok());
    /// assert!(PayrollPeriod::new(0, 2025).is_err());
    /// ```
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        let period = Self { year, month };
        period.validate()?;
        Ok(period)
    }

    /// Checks the month is within 1-12.
    pub fn validate(&self) -> EngineResult<()> {
        if (1..=12).contains(&self.month) {
            Ok(())
        } else {
            Err(EngineError::InvalidPeriod {
                month: self.month,
                year: self.year,
            })
        }
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The identity under which at most one payroll record is live.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayrollKey {
    /// The employee paid.
    pub employee_id: String,
    /// The month paid for.
    pub period: PayrollPeriod,
}

/// Earning components. Every component is a non-negative amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Basic pay.
    pub basic: Money,
    /// House rent allowance.
    pub hra: Money,
    /// Conveyance allowance.
    pub conveyance: Money,
    /// Medical allowance.
    pub medical: Money,
    /// Special allowance.
    pub special: Money,
    /// Bonus.
    pub bonus: Money,
}

impl Earnings {
    /// Components paired with their field names.
    pub fn components(&self) -> [(&'static str, Money); 6] {
        [
            ("basic", self.basic),
            ("hra", self.hra),
            ("conveyance", self.conveyance),
            ("medical", self.medical),
            ("special", self.special),
            ("bonus", self.bonus),
        ]
    }

    /// Sum of all components.
    pub fn total(&self) -> Money {
        self.components().iter().map(|(_, amount)| *amount).sum()
    }
}

/// Deduction components. Every component is a non-negative amount supplied
/// by the caller; nothing here is derived from tax tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Provident fund.
    pub pf: Money,
    /// Employee state insurance.
    pub esi: Money,
    /// Professional tax.
    pub pt: Money,
    /// Tax deducted at source.
    pub tds: Money,
    /// Salary advance recovered. Older records predate this field.
    #[serde(default)]
    pub advance: Money,
}

impl Deductions {
    /// Components paired with their field names.
    pub fn components(&self) -> [(&'static str, Money); 5] {
        [
            ("pf", self.pf),
            ("esi", self.esi),
            ("pt", self.pt),
            ("tds", self.tds),
            ("advance", self.advance),
        ]
    }

    /// Sum of all components.
    pub fn total(&self) -> Money {
        self.components().iter().map(|(_, amount)| *amount).sum()
    }
}

/// Gross, deduction and net totals derived from a component set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollTotals {
    /// Sum of earnings.
    pub gross_salary: Money,
    /// Sum of deductions.
    pub total_deductions: Money,
    /// Gross minus deductions; negative when deductions exceed earnings.
    pub net_salary: Money,
}

/// A processed salary for one employee and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    /// Identifier of this record.
    #[serde(rename = "salaryId")]
    pub record_id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// The month paid for.
    #[serde(flatten)]
    pub period: PayrollPeriod,
    /// How the salary is paid out.
    pub payment_type: PaymentType,
    /// Days worked in the period.
    pub working_days: u32,
    /// Earning components.
    #[serde(alias = "components")]
    pub earnings: Earnings,
    /// Deduction components.
    pub deductions: Deductions,
    /// Totals derived from `earnings` and `deductions`.
    #[serde(flatten)]
    pub totals: PayrollTotals,
    /// Lifecycle status.
    #[serde(default)]
    pub status: PayrollStatus,
}

impl PayrollRecord {
    /// The key this record is live under.
    pub fn key(&self) -> PayrollKey {
        PayrollKey {
            employee_id: self.employee_id.clone(),
            period: self.period,
        }
    }

    /// Returns true if deductions exceed earnings.
    pub fn is_net_negative(&self) -> bool {
        self.totals.net_salary.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_ordering_is_chronological() {
        let dec_2024 = PayrollPeriod::new(12, 2024).unwrap();
        let jan_2025 = PayrollPeriod::new(1, 2025).unwrap();
        assert!(dec_2024 < jan_2025);
        assert_eq!(jan_2025.to_string(), "2025-01");
    }

    #[test]
    fn test_period_rejects_month_13() {
        assert!(matches!(
            PayrollPeriod::new(13, 2025),
            Err(EngineError::InvalidPeriod { month: 13, year: 2025 })
        ));
    }

    #[test]
    fn test_payment_type_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentType::Cheque).unwrap(), "\"CHEQUE\"");
        let parsed: PaymentType = serde_json::from_str("\"BANK\"").unwrap();
        assert_eq!(parsed, PaymentType::Bank);
    }

    #[test]
    fn test_earnings_total() {
        let earnings = Earnings {
            basic: Money::from_major(15000),
            hra: Money::from_major(5000),
            ..Earnings::default()
        };
        assert_eq!(earnings.total(), Money::from_major(20000));
    }

    #[test]
    fn test_legacy_deductions_without_advance() {
        let json = r#"{ "pf": 1800, "esi": 0, "pt": 200, "tds": 500 }"#;
        let deductions: Deductions = serde_json::from_str(json).unwrap();
        assert_eq!(deductions.advance, Money::ZERO);
        assert_eq!(deductions.total(), Money::from_major(2500));
    }

    #[test]
    fn test_deductions_missing_required_component_is_rejected() {
        let json = r#"{ "pf": 1800, "esi": 0, "pt": 200 }"#;
        let result: Result<Deductions, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_deserializes_backend_shape() {
        let json = r#"{
            "salaryId": "7f1c6d0e-8f5a-4c7b-9a59-0c2b1e4d5f60",
            "employeeId": "E1",
            "month": 11,
            "year": 2025,
            "paymentType": "BANK",
            "workingDays": 26,
            "components": {
                "basic": 15000, "hra": 5000, "conveyance": 0,
                "medical": 0, "special": 0, "bonus": 0
            },
            "deductions": { "pf": 1800, "esi": 0, "pt": 0, "tds": 500 },
            "grossSalary": 20000,
            "totalDeductions": 2300,
            "netSalary": 17700,
            "status": "Processed"
        }"#;
        let record: PayrollRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.period, PayrollPeriod { year: 2025, month: 11 });
        assert_eq!(record.earnings.basic, Money::from_major(15000));
        assert_eq!(record.totals.net_salary, Money::from_major(17700));
        assert_eq!(record.status, PayrollStatus::Processed);
        assert!(!record.is_net_negative());
    }

    #[test]
    fn test_record_json_round_trip_keeps_negative_net() {
        let record = PayrollRecord {
            record_id: Uuid::new_v4(),
            employee_id: "E2".to_string(),
            period: PayrollPeriod::new(11, 2025).unwrap(),
            payment_type: PaymentType::Cash,
            working_days: 26,
            earnings: Earnings {
                basic: Money::from_major(10000),
                ..Earnings::default()
            },
            deductions: Deductions {
                advance: Money::from_major(12000),
                ..Deductions::default()
            },
            totals: PayrollTotals {
                gross_salary: Money::from_major(10000),
                total_deductions: Money::from_major(12000),
                net_salary: Money::from_major(-2000),
            },
            status: PayrollStatus::Processed,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["netSalary"], "-2000.00");
        assert_eq!(json["earnings"]["basic"], "10000.00");

        let parsed: PayrollRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
        assert!(parsed.is_net_negative());
    }
}
