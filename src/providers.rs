//! Ports for the collaborators that own roster, attendance and branch data.
//!
//! The engine reads through these traits and never persists anything itself.
//! Fixture implementations backed by in-memory data are provided for hosts
//! that already hold the data and for tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEvent, Branch, Employee};

/// Supplies the current employee list.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Every employee as of now. No history is kept.
    async fn employees(&self) -> EngineResult<Vec<Employee>>;
}

/// Supplies attendance events by calendar date.
#[async_trait]
pub trait EventProvider: Send + Sync {
    /// Events whose check-in falls on `date`. May fail for a single day.
    async fn events_on(&self, date: NaiveDate) -> EngineResult<Vec<AttendanceEvent>>;
}

/// Supplies branch labels.
#[async_trait]
pub trait BranchProvider: Send + Sync {
    /// Every known branch.
    async fn branches(&self) -> EngineResult<Vec<Branch>>;
}

/// A roster held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticRosterProvider {
    employees: Vec<Employee>,
}

impl StaticRosterProvider {
    /// Wraps a fixed employee list.
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }
}

#[async_trait]
impl RosterProvider for StaticRosterProvider {
    async fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.employees.clone())
    }
}

/// Branch labels held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticBranchProvider {
    branches: Vec<Branch>,
}

impl StaticBranchProvider {
    /// Wraps a fixed branch list.
    pub fn new(branches: Vec<Branch>) -> Self {
        Self { branches }
    }
}

#[async_trait]
impl BranchProvider for StaticBranchProvider {
    async fn branches(&self) -> EngineResult<Vec<Branch>> {
        Ok(self.branches.clone())
    }
}

/// Attendance events held in memory, indexed by date.
///
/// Dates can be marked unavailable to reproduce a per-day outage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventProvider {
    by_date: BTreeMap<NaiveDate, Vec<AttendanceEvent>>,
    unavailable: BTreeMap<NaiveDate, String>,
}

impl InMemoryEventProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds events under `date`.
    pub fn with_events(mut self, date: NaiveDate, events: Vec<AttendanceEvent>) -> Self {
        self.by_date.entry(date).or_default().extend(events);
        self
    }

    /// Makes every fetch for `date` fail with `message`.
    pub fn with_outage(mut self, date: NaiveDate, message: impl Into<String>) -> Self {
        self.unavailable.insert(date, message.into());
        self
    }
}

#[async_trait]
impl EventProvider for InMemoryEventProvider {
    async fn events_on(&self, date: NaiveDate) -> EngineResult<Vec<AttendanceEvent>> {
        if let Some(message) = self.unavailable.get(&date) {
            return Err(EngineError::FetchFailed {
                source_name: "in-memory events".to_string(),
                message: message.clone(),
            });
        }
        Ok(self.by_date.get(&date).cloned().unwrap_or_default())
    }
}
