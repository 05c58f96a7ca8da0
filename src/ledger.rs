//! Payroll record storage and the ledger that applies process and edit.
//!
//! The engine does not own persistence. [`PayrollStore`] is the seam a host
//! implements over its own database; [`InMemoryPayrollStore`] backs tests and
//! hosts that keep records in memory.

use std::collections::BTreeMap;

use tracing::debug;
use uuid::Uuid;

use crate::calculation::{
    PayrollDefaults, PayrollInput, PayrollRegister, edit_salary, payroll_register, process_salary,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollKey, PayrollPeriod, PayrollRecord};

/// Storage for payroll records with at most one live record per key.
pub trait PayrollStore {
    /// The record with `record_id`, if any.
    fn find(&self, record_id: Uuid) -> Option<PayrollRecord>;

    /// The record live under `key`, if any.
    fn find_by_key(&self, key: &PayrollKey) -> Option<PayrollRecord>;

    /// Inserts or replaces a record by id.
    ///
    /// Must fail with `PeriodConflict` when another record is live under the
    /// record's key, and must release the key the record previously held.
    fn upsert(&mut self, record: PayrollRecord) -> EngineResult<()>;

    /// Every record for one employee, in any order.
    fn records_for(&self, employee_id: &str) -> Vec<PayrollRecord>;

    /// Every record, in any order.
    fn all(&self) -> Vec<PayrollRecord>;
}

/// A [`PayrollStore`] held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPayrollStore {
    records: BTreeMap<Uuid, PayrollRecord>,
    keys: BTreeMap<PayrollKey, Uuid>,
}

impl InMemoryPayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PayrollStore for InMemoryPayrollStore {
    fn find(&self, record_id: Uuid) -> Option<PayrollRecord> {
        self.records.get(&record_id).cloned()
    }

    fn find_by_key(&self, key: &PayrollKey) -> Option<PayrollRecord> {
        self.keys.get(key).and_then(|id| self.find(*id))
    }

    fn upsert(&mut self, record: PayrollRecord) -> EngineResult<()> {
        let key = record.key();
        if self.keys.get(&key).is_some_and(|owner| *owner != record.record_id) {
            return Err(EngineError::PeriodConflict {
                employee_id: key.employee_id,
                month: key.period.month,
                year: key.period.year,
            });
        }

        if let Some(previous) = self.records.get(&record.record_id) {
            let previous_key = previous.key();
            if previous_key != key {
                debug!(
                    record_id = %record.record_id,
                    from = %previous_key.period,
                    to = %key.period,
                    "Releasing payroll key"
                );
                self.keys.remove(&previous_key);
            }
        }

        self.keys.insert(key, record.record_id);
        self.records.insert(record.record_id, record);
        Ok(())
    }

    fn records_for(&self, employee_id: &str) -> Vec<PayrollRecord> {
        self.records
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<PayrollRecord> {
        self.records.values().cloned().collect()
    }
}

/// Applies salary submissions against a [`PayrollStore`].
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::{PayrollDefaults, PayrollInput};
/// use workforce_engine::ledger::{InMemoryPayrollStore, PayrollLedger};
/// use workforce_engine::models::{Deductions, Earnings, PayrollPeriod};
/// use workforce_engine::values::Money;
///
/// let mut ledger = PayrollLedger::new(InMemoryPayrollStore::new(), PayrollDefaults::default());
/// let input = PayrollInput {
///     employee_id: "E1".to_string(),
///     period: PayrollPeriod::new(11, 2025)?,
///     payment_type: None,
///     working_days: None,
///     earnings: Earnings { basic: Money::from_major(15000), ..Earnings::default() },
///     deductions: Deductions::default(),
/// };
///
/// let first = ledger.process(&input)?;
/// let again = ledger.process(&input)?;
/// assert_eq!(first, again);
/// assert_eq!(ledger.history("E1").len(), 1);
/// # Ok::<(), workforce_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PayrollLedger<S> {
    store: S,
    defaults: PayrollDefaults,
}

impl<S: PayrollStore> PayrollLedger<S> {
    /// Creates a ledger over `store`.
    pub fn new(store: S, defaults: PayrollDefaults) -> Self {
        Self { store, defaults }
    }

    /// Processes a submission, replacing any record live under its key.
    pub fn process(&mut self, input: &PayrollInput) -> EngineResult<PayrollRecord> {
        let existing = self.store.find_by_key(&input.key());
        let record = process_salary(input, existing.as_ref(), &self.defaults)?;
        self.store.upsert(record.clone())?;
        Ok(record)
    }

    /// Edits the record with `record_id`.
    ///
    /// The submission may move the record to another employee or month; the
    /// old key is released. Moving onto a key held by a different record
    /// fails with `PeriodConflict` and leaves the store unchanged.
    pub fn edit(&mut self, record_id: Uuid, input: &PayrollInput) -> EngineResult<PayrollRecord> {
        let existing = self.store.find(record_id);
        let record = edit_salary(existing.as_ref(), record_id, input, &self.defaults)?;
        self.store.upsert(record.clone())?;
        Ok(record)
    }

    /// One employee's records, newest period first.
    pub fn history(&self, employee_id: &str) -> Vec<PayrollRecord> {
        let mut records = self.store.records_for(employee_id);
        records.sort_by(|a, b| b.period.cmp(&a.period));
        records
    }

    /// Register over every record for `period`.
    pub fn register_for(&self, period: PayrollPeriod) -> PayrollRegister {
        let records: Vec<PayrollRecord> = self
            .store
            .all()
            .into_iter()
            .filter(|r| r.period == period)
            .collect();
        payroll_register(&records)
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
