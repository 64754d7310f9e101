//! Audit text and edge-trigger derivation.
//!
//! Pure helpers: they compare before/after records and build the
//! human-readable fragments used in activity log entries.

use crate::model::client::{Client, LoanDetails};
use crate::model::user::User;
use crate::service::state::CrmState;

/// Loan milestone crossed by one client update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanMilestone {
    Approved,
    Disbursed,
}

/// Lists tracked client fields that differ between `prev` and `next`.
///
/// Tracked: name, status, assignee, approved amount.
pub fn client_changes(prev: &Client, next: &Client, state: &CrmState) -> Vec<String> {
    let mut changes = Vec::new();
    if prev.name != next.name {
        changes.push(format!(
            "name changed from \"{}\" to \"{}\"",
            prev.name, next.name
        ));
    }
    if prev.status != next.status {
        changes.push(format!(
            "status changed from {} to {}",
            prev.status, next.status
        ));
    }
    if prev.assigned_to != next.assigned_to {
        changes.push(format!(
            "reassigned from {} to {}",
            state.user_label(prev.assigned_to.as_deref()),
            state.user_label(next.assigned_to.as_deref())
        ));
    }
    if prev.loan_details.approved_amount != next.loan_details.approved_amount {
        changes.push(format!(
            "approved amount changed from {} to {}",
            format_amount(prev.loan_details.approved_amount),
            format_amount(next.loan_details.approved_amount)
        ));
    }
    changes
}

/// Lists tracked user fields that differ between `prev` and `next`.
///
/// Tracked: name, role, status, shift start, shift end.
pub fn user_changes(prev: &User, next: &User) -> Vec<String> {
    let mut changes = Vec::new();
    if prev.name != next.name {
        changes.push(format!(
            "name changed from \"{}\" to \"{}\"",
            prev.name, next.name
        ));
    }
    if prev.role != next.role {
        changes.push(format!("role changed from {} to {}", prev.role, next.role));
    }
    if prev.status != next.status {
        changes.push(format!(
            "status changed from {} to {}",
            prev.status, next.status
        ));
    }
    if prev.shift_start_time != next.shift_start_time {
        changes.push(format!(
            "shift start changed from {} to {}",
            shift_label(prev.shift_start_time.as_deref()),
            shift_label(next.shift_start_time.as_deref())
        ));
    }
    if prev.shift_end_time != next.shift_end_time {
        changes.push(format!(
            "shift end changed from {} to {}",
            shift_label(prev.shift_end_time.as_deref()),
            shift_label(next.shift_end_time.as_deref())
        ));
    }
    changes
}

/// Milestones crossed on a zero to non-zero transition only.
pub fn loan_milestones(prev: &LoanDetails, next: &LoanDetails) -> Vec<LoanMilestone> {
    let mut milestones = Vec::new();
    if prev.approved_amount == 0 && next.approved_amount > 0 {
        milestones.push(LoanMilestone::Approved);
    }
    if prev.disbursed_amount == 0 && next.disbursed_amount > 0 {
        milestones.push(LoanMilestone::Disbursed);
    }
    milestones
}

/// Audit verb for a task write.
pub fn task_action(is_completion: bool, completed: bool) -> &'static str {
    match (is_completion, completed) {
        (true, true) => "completed task",
        (true, false) => "reopened task",
        (false, _) => "updated task",
    }
}

/// Formats an amount with thousands separators, e.g. `5,000,000`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn shift_label(value: Option<&str>) -> &str {
    value.unwrap_or("unset")
}
