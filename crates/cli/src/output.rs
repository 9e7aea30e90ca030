//! Text and JSON rendering of command results.

use civic_core::complaint::Complaint;
use civic_core::department::{Department, DepartmentOfficer};
use civic_core::user::UserProfile;
use serde::Serialize;

/// Output mode selected by `--json`.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print `value` as pretty JSON in JSON mode, or `text` otherwise.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

pub fn user(user: &UserProfile) -> String {
    let mut lines = vec![format!("{} ({})", user.display_name(), user.username)];
    if !user.email.is_empty() {
        lines.push(format!("Email:      {}", user.email));
    }
    lines.push(format!(
        "Role:       {}",
        if user.is_staff { "administrator" } else { "citizen" }
    ));
    if let Some(department) = &user.department {
        lines.push(format!("Department: {}", department.name));
    }
    if let Some(role) = &user.role {
        lines.push(format!("Position:   {role}"));
    }
    lines.join("\n")
}

/// One line per complaint.
pub fn complaint_table(complaints: &[Complaint]) -> String {
    if complaints.is_empty() {
        return "No complaints found.".to_string();
    }
    complaints
        .iter()
        .map(|c| {
            format!(
                "{:<6} {:<14} {:<12} {:<18} {:>4}  {}",
                c.id,
                c.complaint_id,
                c.status.name(),
                c.category_label(),
                c.upvote_count,
                c.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full detail view with the status timeline.
pub fn complaint_detail(c: &Complaint) -> String {
    let mut lines = vec![
        format!("{}  {}", c.complaint_id, c.title),
        format!("Status:      {}", c.status),
        format!("Category:    {}", c.category_label()),
        format!("Location:    {}", c.location),
    ];
    if let (Some(lat), Some(lon)) = (c.latitude, c.longitude) {
        lines.push(format!("Coordinates: {lat:.6}, {lon:.6}"));
    }
    if let Some(date) = c.date {
        lines.push(format!("Submitted:   {date}"));
    }
    if let Some(by) = &c.submitted_by {
        lines.push(format!("Reported by: {by}"));
    }
    lines.push(format!(
        "Upvotes:     {}{}",
        c.upvote_count,
        if c.is_upvoted { " (you upvoted)" } else { "" }
    ));
    if let Some(image) = c.cover_image() {
        lines.push(format!("Image:       {image}"));
    }
    if !c.description.is_empty() {
        lines.push(String::new());
        lines.push(c.description.clone());
    }
    lines.push(String::new());
    lines.push(timeline(c));
    lines.join("\n")
}

fn timeline(c: &Complaint) -> String {
    c.status
        .timeline()
        .into_iter()
        .map(|(step, reached)| format!("[{}] {}", if reached { "x" } else { " " }, step))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn departments(departments: &[Department]) -> String {
    if departments.is_empty() {
        return "No departments.".to_string();
    }
    departments
        .iter()
        .map(|d| format!("{:<4} {}", d.id, d.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn officers(officers: &[DepartmentOfficer]) -> String {
    if officers.is_empty() {
        return "No officers in this department.".to_string();
    }
    officers
        .iter()
        .map(|o| {
            format!(
                "{:<4} {:<20} {}",
                o.id,
                o.username,
                o.role.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
