//! Attendance presence rollups and payroll totals for branch workforces.
//!
//! This crate turns raw attendance events into per-employee daily summaries,
//! rolls them up into unique-presence counts per roster, branch and date
//! range, and computes payroll totals from caller-supplied components. Data
//! is read through the provider ports in [`providers`]; nothing is persisted
//! except through a caller-owned [`ledger::PayrollStore`].

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod providers;
pub mod service;
pub mod values;
