//! Departments that complaints are routed to, and their officers.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A department responsible for one or more complaint categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A staff member attached to a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentOfficer {
    pub id: DbId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Role within the department, e.g. `ward_officer` or `department_head`.
    #[serde(default)]
    pub role: Option<String>,
}
