//! In-memory notification center.
//!
//! # Responsibility
//! - Hold the read/unread inbox and the auto-expiring toast queue.
//! - Derive due-task and follow-up reminders from current state.
//!
//! # Invariants
//! - Notifications are never persisted; logout or restart clears them.
//! - Every pushed notification lands in both the inbox and the toast queue.
//! - Inbox order is newest first.
//! - A reminder for one (type, record, day) is derived at most once per
//!   session.

use crate::model::client::{Client, ClientStatus};
use crate::model::new_id;
use crate::model::task::Task;
use crate::model::user::User;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{HashSet, VecDeque};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    TaskDue,
    FollowUp,
    StatusChange,
    Info,
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::TaskDue => "TaskDue",
            Self::FollowUp => "FollowUp",
            Self::StatusChange => "StatusChange",
            Self::Info => "Info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationType,
    pub related_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Toast entry with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    inbox: Vec<Notification>,
    toasts: VecDeque<Toast>,
    toast_ttl: Duration,
    derived_keys: HashSet<String>,
}

impl NotificationCenter {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            inbox: Vec::new(),
            toasts: VecDeque::new(),
            toast_ttl,
            derived_keys: HashSet::new(),
        }
    }

    /// Publishes one notification to the inbox and the toast queue.
    ///
    /// Returns the new notification id.
    pub fn push(
        &mut self,
        kind: NotificationType,
        message: impl Into<String>,
        related_id: Option<String>,
        now: DateTime<Utc>,
    ) -> String {
        let notification = Notification {
            id: new_id("notification"),
            message: message.into(),
            kind,
            related_id,
            timestamp: now,
            read: false,
        };
        let id = notification.id.clone();
        self.toasts.push_back(Toast {
            notification: notification.clone(),
            expires_at: now + self.toast_ttl,
        });
        self.inbox.insert(0, notification);
        id
    }

    /// Inbox, newest first.
    pub fn inbox(&self) -> &[Notification] {
        &self.inbox
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.iter().filter(|n| !n.read).count()
    }

    /// Marks one inbox entry read. Returns `false` for unknown ids.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.inbox.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for notification in &mut self.inbox {
            notification.read = true;
        }
    }

    pub fn clear_inbox(&mut self) {
        self.inbox.clear();
    }

    /// Drops expired toasts and returns the ones still visible, oldest first.
    pub fn active_toasts(&mut self, now: DateTime<Utc>) -> Vec<&Toast> {
        self.toasts.retain(|toast| toast.expires_at > now);
        self.toasts.iter().collect()
    }

    pub fn dismiss_toast(&mut self, id: &str) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.notification.id != id);
        self.toasts.len() != before
    }

    /// Forgets everything, including which reminders were already derived.
    pub fn reset(&mut self) {
        self.inbox.clear();
        self.toasts.clear();
        self.derived_keys.clear();
    }

    /// Derives due-task and follow-up reminders for `viewer`.
    ///
    /// Rules:
    /// - Open tasks owned by the viewer with `due_date <= today`.
    /// - Viewer-assigned clients in `Follow-up` with `follow_up_date <= today`.
    ///
    /// Returns the number of notifications pushed by this scan.
    pub fn scan_due(
        &mut self,
        tasks: &[Task],
        clients: &[Client],
        viewer: &User,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> usize {
        let mut pushed = 0;

        for task in tasks {
            if task.completed || !task.is_owned_by(&viewer.id) || task.due_date > today {
                continue;
            }
            if !self.first_derivation(NotificationType::TaskDue, &task.id, today) {
                continue;
            }
            let message = if task.due_date == today {
                format!("Task due today: {}", task.title)
            } else {
                format!("Task overdue since {}: {}", task.due_date, task.title)
            };
            self.push(NotificationType::TaskDue, message, Some(task.id.clone()), now);
            pushed += 1;
        }

        for client in clients {
            if client.status != ClientStatus::FollowUp || !client.is_assigned_to(&viewer.id) {
                continue;
            }
            let Some(follow_up) = client.follow_up_date else {
                continue;
            };
            if follow_up > today {
                continue;
            }
            if !self.first_derivation(NotificationType::FollowUp, &client.id, today) {
                continue;
            }
            self.push(
                NotificationType::FollowUp,
                format!("Follow up with {} today", client.name),
                Some(client.id.clone()),
                now,
            );
            pushed += 1;
        }

        pushed
    }

    fn first_derivation(&mut self, kind: NotificationType, related_id: &str, day: NaiveDate) -> bool {
        self.derived_keys.insert(format!("{kind}:{related_id}:{day}"))
    }
}
