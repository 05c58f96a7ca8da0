//! Employee, branch and roster models.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// An employee as returned by the roster provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// The branch the employee is assigned to, if any.
    #[serde(default)]
    pub branch_id: Option<String>,
    /// Face registration handle; present once the employee has enrolled.
    #[serde(default)]
    pub face_id: Option<String>,
    /// Job title.
    #[serde(default)]
    pub designation: Option<String>,
}

impl Employee {
    /// Returns true if the employee has a face registered for check-in.
    pub fn is_face_registered(&self) -> bool {
        self.face_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

/// A branch, used only to label branch rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Unique identifier for the branch.
    pub branch_id: String,
    /// Display name.
    pub name: String,
    /// Whether the branch is currently accepting check-ins.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// The set of employees in scope "as of now".
///
/// Employee ids are unique within a roster; if the provider repeats an id the
/// first occurrence wins.
///
/// # Example
///
/// ```
/// use workforce_engine::models::{Employee, Roster};
///
/// let roster = Roster::new(vec![
///     Employee {
///         employee_id: "E1".to_string(),
///         name: "Asha".to_string(),
///         branch_id: Some("B1".to_string()),
///         face_id: Some("face-1".to_string()),
///         designation: None,
///     },
///     Employee {
///         employee_id: "E2".to_string(),
///         name: "Ravi".to_string(),
///         branch_id: None,
///         face_id: None,
///         designation: None,
///     },
/// ]);
/// assert_eq!(roster.len(), 2);
/// assert_eq!(roster.registered_ids().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    /// Builds a roster, dropping repeated employee ids.
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut seen = BTreeSet::new();
        let mut unique = Vec::with_capacity(employees.len());
        for employee in employees {
            if seen.insert(employee.employee_id.clone()) {
                unique.push(employee);
            } else {
                debug!(employee_id = %employee.employee_id, "Dropping repeated roster entry");
            }
        }
        Self { employees: unique }
    }

    /// The employees in provider order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Number of distinct employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true if the roster has no employees.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// All employee ids.
    pub fn ids(&self) -> BTreeSet<String> {
        self.employees.iter().map(|e| e.employee_id.clone()).collect()
    }

    /// Ids of employees with a registered face.
    pub fn registered_ids(&self) -> BTreeSet<String> {
        self.employees
            .iter()
            .filter(|e| e.is_face_registered())
            .map(|e| e.employee_id.clone())
            .collect()
    }

    /// Partitions employee ids by branch. Employees without a branch are
    /// grouped under `None`, so the parts always cover the whole roster.
    pub fn branch_partition(&self) -> BTreeMap<Option<String>, BTreeSet<String>> {
        let mut parts: BTreeMap<Option<String>, BTreeSet<String>> = BTreeMap::new();
        for employee in &self.employees {
            parts
                .entry(employee.branch_id.clone())
                .or_default()
                .insert(employee.employee_id.clone());
        }
        parts
    }

    /// Looks up an employee by id.
    pub fn get(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.employee_id == employee_id)
    }
}
