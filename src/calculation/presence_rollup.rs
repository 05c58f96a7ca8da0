//! Presence rollups over a roster.
//!
//! Every count here is taken over distinct employee ids. Branch rollups are
//! computed per branch and their totals are the elementwise sum, so branch
//! subtotals always reconcile with the grand total.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Branch, DailySummary, PresenceSet, Roster, RosterRollup};

/// Collects who was present, and who was late, among `roster`.
///
/// An employee counts as late for the day if any of their sessions was
/// flagged late, even when the latest session was on time. Present employees
/// outside the roster are ignored.
pub fn presence_from_summaries(
    summaries: &BTreeMap<String, DailySummary>,
    roster: &BTreeSet<String>,
) -> PresenceSet {
    let mut presence = PresenceSet::default();
    let mut off_roster = 0usize;

    for (employee_id, summary) in summaries {
        if !summary.is_present {
            continue;
        }
        if !roster.contains(employee_id) {
            off_roster += 1;
            continue;
        }
        presence.present.insert(employee_id.clone());
        if summary.was_late() {
            presence.late.insert(employee_id.clone());
        }
    }

    if off_roster > 0 {
        debug!(off_roster, "Ignoring present employees outside the roster");
    }
    presence
}

/// Rolls one day's summaries up against a roster.
///
/// # Example
///
/// ```
/// use std::collections::{BTreeMap, BTreeSet};
/// use workforce_engine::calculation::rollup_day;
///
/// let roster: BTreeSet<String> = ["E1", "E2", "E3"].iter().map(|s| s.to_string()).collect();
/// let rollup = rollup_day(&BTreeMap::new(), &roster);
/// assert_eq!(rollup.total_employees, 3);
/// assert_eq!(rollup.absent_count, 3);
/// assert_eq!(rollup.attendance_rate_percent, 0);
/// ```
pub fn rollup_day(
    summaries: &BTreeMap<String, DailySummary>,
    roster: &BTreeSet<String>,
) -> RosterRollup {
    presence_from_summaries(summaries, roster).rollup(roster.len())
}

/// One branch's rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRollup {
    /// The branch, or `None` for employees without a branch.
    pub branch_id: Option<String>,
    /// Display name from the branch provider, when known.
    pub branch_name: Option<String>,
    /// Employees in the branch with a registered face.
    pub registered_count: usize,
    /// Counts for the branch.
    pub rollup: RosterRollup,
}

/// Per-branch rollups and their reconciled totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRollupReport {
    /// One entry per branch, ordered by branch id; unassigned employees last.
    pub branches: Vec<BranchRollup>,
    /// Elementwise sum of every branch entry.
    pub totals: RosterRollup,
    /// Sum of every branch's registered count.
    pub registered_total: usize,
}

impl BranchRollupReport {
    /// Finds a branch entry by id.
    pub fn branch(&self, branch_id: &str) -> Option<&BranchRollup> {
        self.branches
            .iter()
            .find(|b| b.branch_id.as_deref() == Some(branch_id))
    }
}

/// Rolls one day's summaries up per branch.
///
/// The roster is partitioned by branch id; employees without a branch form
/// their own entry so the partition covers the whole roster. Branches known
/// only from `branches` get a zero-sized entry. `branches` supplies labels
/// and nothing else.
pub fn rollup_by_branch(
    summaries: &BTreeMap<String, DailySummary>,
    roster: &Roster,
    branches: &[Branch],
) -> BranchRollupReport {
    let names: BTreeMap<&str, &str> = branches
        .iter()
        .map(|b| (b.branch_id.as_str(), b.name.as_str()))
        .collect();
    let registered = roster.registered_ids();

    let mut partition = roster.branch_partition();
    for branch in branches {
        partition.entry(Some(branch.branch_id.clone())).or_default();
    }
    let unassigned = partition.remove(&None);

    let mut entries: Vec<BranchRollup> = partition
        .into_iter()
        .map(|(branch_id, members)| {
            let branch_name = branch_id
                .as_deref()
                .and_then(|id| names.get(id))
                .map(|name| name.to_string());
            branch_entry(branch_id, branch_name, &members, summaries, &registered)
        })
        .collect();

    if let Some(members) = unassigned {
        entries.push(branch_entry(None, None, &members, summaries, &registered));
    }

    BranchRollupReport {
        totals: entries.iter().map(|b| b.rollup).sum(),
        registered_total: entries.iter().map(|b| b.registered_count).sum(),
        branches: entries,
    }
}

fn branch_entry(
    branch_id: Option<String>,
    branch_name: Option<String>,
    members: &BTreeSet<String>,
    summaries: &BTreeMap<String, DailySummary>,
    registered: &BTreeSet<String>,
) -> BranchRollup {
    BranchRollup {
        branch_id,
        branch_name,
        registered_count: members.intersection(registered).count(),
        rollup: rollup_day(summaries, members),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregate_sessions;
    use crate::models::{AttendanceEvent, AttendanceStatus, Employee};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 10).unwrap()
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn session(employee: &str, id: &str, hour: u32, status: AttendanceStatus) -> AttendanceEvent {
        AttendanceEvent {
            employee_id: employee.to_string(),
            attendance_id: id.to_string(),
            check_in_time: Utc.with_ymd_and_hms(2025, 11, 10, hour, 0, 0).unwrap(),
            check_out_time: None,
            status,
        }
    }

    fn employee(id: &str, branch: Option<&str>, face: bool) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: id.to_string(),
            branch_id: branch.map(str::to_string),
            face_id: face.then(|| format!("face-{id}")),
            designation: None,
        }
    }

    #[test]
    fn test_one_of_three_present() {
        let events = [session("E1", "A-1", 9, AttendanceStatus::Present)];
        let summaries = aggregate_sessions(&events, date());
        let rollup = rollup_day(&summaries, &ids(&["E1", "E2", "E3"]));

        assert_eq!(rollup.unique_present_count, 1);
        assert_eq!(rollup.absent_count, 2);
        assert_eq!(rollup.attendance_rate_percent, 33);
    }

    #[test]
    fn test_multiple_sessions_do_not_inflate_presence() {
        let events = vec![
            session("E1", "A-1", 9, AttendanceStatus::Present),
            session("E1", "A-2", 13, AttendanceStatus::Present),
            session("E1", "A-3", 16, AttendanceStatus::Present),
        ];
        let summaries = aggregate_sessions(&events, date());
        let rollup = rollup_day(&summaries, &ids(&["E1", "E2"]));

        assert_eq!(rollup.unique_present_count, 1);
        assert_eq!(rollup.absent_count, 1);
    }

    #[test]
    fn test_late_if_any_session_late() {
        let events = vec![
            session("E1", "A-1", 9, AttendanceStatus::Late),
            session("E1", "A-2", 14, AttendanceStatus::Present),
            session("E2", "A-3", 9, AttendanceStatus::Present),
        ];
        let summaries = aggregate_sessions(&events, date());
        let rollup = rollup_day(&summaries, &ids(&["E1", "E2"]));

        assert_eq!(rollup.late_count, 1);
        assert_eq!(rollup.on_time_count, 1);
    }

    #[test]
    fn test_off_roster_presence_is_ignored() {
        let events = vec![
            session("E1", "A-1", 9, AttendanceStatus::Present),
            session("TERMINATED", "A-2", 9, AttendanceStatus::Late),
        ];
        let summaries = aggregate_sessions(&events, date());
        let rollup = rollup_day(&summaries, &ids(&["E1", "E2"]));

        assert_eq!(rollup.total_employees, 2);
        assert_eq!(rollup.unique_present_count, 1);
        assert_eq!(rollup.late_count, 0);
    }

    #[test]
    fn test_empty_roster_rate_is_zero() {
        let events = [session("E1", "A-1", 9, AttendanceStatus::Present)];
        let summaries = aggregate_sessions(&events, date());
        let rollup = rollup_day(&summaries, &BTreeSet::new());
        assert_eq!(rollup, RosterRollup::default());
    }

    #[test]
    fn test_branch_totals_reconcile_with_global() {
        let roster = Roster::new(vec![
            employee("E1", Some("B1"), true),
            employee("E2", Some("B1"), false),
            employee("E3", Some("B2"), true),
            employee("E4", None, false),
        ]);
        let events = vec![
            session("E1", "A-1", 9, AttendanceStatus::Late),
            session("E3", "A-2", 9, AttendanceStatus::Present),
            session("E4", "A-3", 10, AttendanceStatus::Late),
        ];
        let summaries = aggregate_sessions(&events, date());

        let report = rollup_by_branch(&summaries, &roster, &[]);
        let global = rollup_day(&summaries, &roster.ids());

        assert_eq!(report.branches.len(), 3);
        assert_eq!(report.totals.unique_present_count, global.unique_present_count);
        assert_eq!(report.totals.late_count, global.late_count);
        assert_eq!(report.totals.absent_count, global.absent_count);
        assert_eq!(report.totals, global);
        assert_eq!(report.registered_total, 2);
    }

    #[test]
    fn test_branch_labels_and_empty_branches() {
        let roster = Roster::new(vec![employee("E1", Some("B1"), true)]);
        let branches = vec![
            Branch {
                branch_id: "B1".to_string(),
                name: "Main Street".to_string(),
                is_active: true,
            },
            Branch {
                branch_id: "B2".to_string(),
                name: "Harbour".to_string(),
                is_active: false,
            },
        ];
        let events = [session("E1", "A-1", 9, AttendanceStatus::Present)];
        let summaries = aggregate_sessions(&events, date());
        let report = rollup_by_branch(&summaries, &roster, &branches);

        let b1 = report.branch("B1").unwrap();
        assert_eq!(b1.branch_name.as_deref(), Some("Main Street"));
        assert_eq!(b1.rollup.unique_present_count, 1);
        assert_eq!(b1.rollup.attendance_rate_percent, 100);
        assert_eq!(b1.registered_count, 1);

        let b2 = report.branch("B2").unwrap();
        assert_eq!(b2.rollup, RosterRollup::default());
    }

    #[test]
    fn test_unassigned_entry_is_last() {
        let roster = Roster::new(vec![
            employee("E9", None, false),
            employee("E1", Some("B1"), false),
        ]);
        let report = rollup_by_branch(&BTreeMap::new(), &roster, &[]);
        assert_eq!(report.branches.last().unwrap().branch_id, None);
        assert_eq!(report.totals.absent_count, 2);
    }
}
