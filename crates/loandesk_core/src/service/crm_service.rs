//! CRM application service: state container, session and audit plumbing.
//!
//! # Responsibility
//! - Own the in-memory state loaded from the record store.
//! - Gate every handler on the signed-in user's permissions.
//! - Append audit entries and publish notifications for mutations.
//!
//! # Invariants
//! - Handlers write the store first and touch memory only after the write
//!   succeeded.
//! - A rejected handler (validation, permission) leaves state, store and
//!   audit trail untouched.
//! - Audit entries are prepended; `state().activity_logs[0]` is the newest.

use crate::access::{self, check_view, Permission, View, ViewAccess};
use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::credentials::verify_password;
use crate::model::activity::{ActivityCategory, ActivityLog, EntityRef};
use crate::model::interaction::Interaction;
use crate::model::new_id;
use crate::model::user::User;
use crate::notify::{NotificationCenter, NotificationType, Toast};
use crate::repo::record_repo::{RecordStore, StoreResult};
use crate::repo::settings_repo::{load_theme, save_theme, SettingsRepository, Theme};
use crate::seed::{init_store, SeedData};
use crate::service::error::{CrmError, CrmResult};
use crate::service::state::CrmState;
use crate::session::{format_duration, BreakTransition, SessionSummary, SessionTracker};
use chrono::{DateTime, Utc};
use log::{error, info, warn};

/// Outcome of loading state from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// Store could not be read; the service runs with empty state.
    Degraded,
}

/// Application-state container injected with its collaborators.
pub struct CrmService<S> {
    pub(super) store: S,
    pub(super) config: ServiceConfig,
    pub(super) clock: Box<dyn Clock>,
    pub(super) seed: SeedData,
    pub(super) state: CrmState,
    pub(super) session: SessionTracker,
    pub(super) notifications: NotificationCenter,
    load_status: LoadStatus,
}

impl<S: RecordStore + SettingsRepository> CrmService<S> {
    /// Seeds an empty store from `seed`, then loads every collection.
    ///
    /// Never fails: store errors are logged and leave the service running
    /// with empty state (`LoadStatus::Degraded`).
    pub fn open(store: S, config: ServiceConfig, clock: Box<dyn Clock>, seed: SeedData) -> Self {
        let notifications = NotificationCenter::new(config.toast_ttl);
        let mut service = Self {
            store,
            config,
            clock,
            seed,
            state: CrmState::default(),
            session: SessionTracker::new(),
            notifications,
            load_status: LoadStatus::Degraded,
        };

        if let Err(err) = init_store(&service.store, &service.seed) {
            error!("event=state_init module=service status=error stage=seed error={err}");
            return service;
        }
        service.reload();
        service
    }

    /// Replaces in-memory state with a fresh read of every collection.
    pub fn reload(&mut self) -> LoadStatus {
        self.load_status = match load_state(&self.store) {
            Ok(state) => {
                info!(
                    "event=state_load module=service status=ok clients={} tasks={} users={}",
                    state.clients.len(),
                    state.tasks.len(),
                    state.users.len()
                );
                self.state = state;
                LoadStatus::Loaded
            }
            Err(err) => {
                error!("event=state_load module=service status=error error={err}");
                self.state = CrmState::default();
                LoadStatus::Degraded
            }
        };
        self.load_status
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn state(&self) -> &CrmState {
        &self.state
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    /// Toasts still visible at the current clock time.
    pub fn active_toasts(&mut self) -> Vec<&Toast> {
        let now = self.clock.now();
        self.notifications.active_toasts(now)
    }

    // ---------------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------------

    /// Signs a user in by username and password.
    ///
    /// # Errors
    /// - `MissingCredentials` when either field is blank.
    /// - `InvalidCredentials` for an unknown username or wrong password.
    /// - `UserInactive` when the account is inactive.
    pub fn login(&mut self, username: &str, password: &str) -> CrmResult<User> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(CrmError::MissingCredentials);
        }

        let user = match self.state.user_by_username(username) {
            Some(user) if verify_password(password, &user.password_hash) => user.clone(),
            _ => {
                warn!("event=login module=service status=rejected reason=invalid_credentials");
                return Err(CrmError::InvalidCredentials);
            }
        };
        if !user.is_active() {
            warn!("event=login module=service status=rejected reason=inactive");
            return Err(CrmError::UserInactive);
        }

        let now = self.clock.now();
        self.notifications.reset();
        self.session.login(user.clone(), now);
        info!("event=login module=service status=ok role={}", user.role);
        self.record_activity(ActivityCategory::Session, "logged in", None);
        Ok(user)
    }

    /// Ends the session. Break counters and notifications are discarded.
    pub fn logout(&mut self) -> CrmResult<SessionSummary> {
        if !self.session.is_logged_in() {
            return Err(CrmError::NotLoggedIn);
        }
        self.record_activity(ActivityCategory::Session, "logged out", None);

        let summary = self
            .session
            .logout(self.clock.now())
            .ok_or(CrmError::NotLoggedIn)?;
        self.notifications.reset();
        info!(
            "event=logout module=service status=ok session_seconds={} break_seconds={}",
            summary.session_seconds, summary.total_break_seconds
        );
        Ok(summary)
    }

    /// Starts or ends a break. Ending a break is audited with its length.
    pub fn toggle_break(&mut self) -> CrmResult<BreakTransition> {
        let transition = self
            .session
            .toggle_break(self.clock.now())
            .map_err(|_| CrmError::NotLoggedIn)?;
        if let BreakTransition::Ended { seconds, .. } = transition {
            self.record_activity(
                ActivityCategory::Session,
                format!("ended break after {}", format_duration(seconds)),
                None,
            );
        }
        Ok(transition)
    }

    /// Whether the signed-in user holds `permission`.
    pub fn can(&self, permission: Permission) -> bool {
        self.session
            .current_user()
            .is_some_and(|user| access::can(user.role, permission))
    }

    /// Resolves which screen to render for `view`.
    pub fn navigate(&self, view: View) -> CrmResult<ViewAccess> {
        let user = self.session.current_user().ok_or(CrmError::NotLoggedIn)?;
        let outcome = check_view(user.role, view);
        if let ViewAccess::AccessDenied { required, .. } = outcome {
            warn!(
                "event=view_denied module=service role={} view={:?} required={}",
                user.role, view, required
            );
        }
        Ok(outcome)
    }

    // ---------------------------------------------------------------------
    // Notifications and settings
    // ---------------------------------------------------------------------

    /// Re-derives due-task and follow-up reminders for the signed-in user.
    pub fn refresh_notifications(&mut self) -> CrmResult<usize> {
        let viewer = self
            .session
            .current_user()
            .cloned()
            .ok_or(CrmError::NotLoggedIn)?;
        let now = self.clock.now();
        let today = self.clock.today();
        Ok(self.notifications.scan_due(
            &self.state.tasks,
            &self.state.clients,
            &viewer,
            today,
            now,
        ))
    }

    pub fn theme(&self) -> CrmResult<Theme> {
        Ok(load_theme(&self.store)?)
    }

    pub fn set_theme(&mut self, theme: Theme) -> CrmResult<()> {
        save_theme(&self.store, theme)?;
        Ok(())
    }

    /// Wipes every record, reseeds demo data and reloads.
    ///
    /// The session ends without an audit entry since the trail was wiped.
    pub fn reset_demo_data(&mut self) -> CrmResult<LoadStatus> {
        self.require(Permission::ResetData)?;
        warn!("event=reset_demo_data module=service status=start");

        self.store.clear_db()?;
        init_store(&self.store, &self.seed)?;
        let status = self.reload();
        self.session.logout(self.clock.now());
        self.notifications.reset();
        Ok(status)
    }

    // ---------------------------------------------------------------------
    // Shared handler plumbing
    // ---------------------------------------------------------------------

    /// Returns a copy of the signed-in user when they hold `permission`.
    pub(super) fn require(&self, permission: Permission) -> CrmResult<User> {
        let user = self.session.current_user().ok_or(CrmError::NotLoggedIn)?;
        if !access::can(user.role, permission) {
            warn!(
                "event=permission_denied module=service role={} permission={}",
                user.role, permission
            );
            return Err(CrmError::PermissionDenied {
                role: user.role,
                permission,
            });
        }
        Ok(user.clone())
    }

    pub(super) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Appends one audit entry for the signed-in user.
    ///
    /// The primary write already happened, so a failed audit write is
    /// logged and swallowed.
    pub(super) fn record_activity(
        &mut self,
        category: ActivityCategory,
        action: impl Into<String>,
        entity: Option<EntityRef>,
    ) {
        let Some(user) = self.session.current_user() else {
            return;
        };
        let entry = ActivityLog {
            id: new_id("activity"),
            timestamp: self.clock.now(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            action: action.into(),
            category,
            entity,
        };

        match self.store.add(&entry) {
            Ok(_) => self.state.activity_logs.insert(0, entry),
            Err(err) => error!(
                "event=activity_append module=service status=error category={:?} error={}",
                category, err
            ),
        }
    }

    pub(super) fn notify(
        &mut self,
        kind: NotificationType,
        message: impl Into<String>,
        related_id: Option<String>,
    ) {
        let now = self.clock.now();
        self.notifications.push(kind, message, related_id, now);
    }
}

fn load_state(store: &impl RecordStore) -> StoreResult<CrmState> {
    let mut interactions = store.get_all()?;
    let mut activity_logs = store.get_all()?;
    newest_first(&mut interactions, |item: &Interaction| item.timestamp);
    newest_first(&mut activity_logs, |item: &ActivityLog| item.timestamp);

    Ok(CrmState {
        clients: store.get_all()?,
        tasks: store.get_all()?,
        interactions,
        users: store.get_all()?,
        teams: store.get_all()?,
        activity_logs,
        commitments: store.get_all()?,
        documents: store.get_all()?,
    })
}

/// Orders by timestamp descending; later insertions win ties.
fn newest_first<T, F>(items: &mut [T], timestamp: F)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.reverse();
    items.sort_by(|a, b| timestamp(b).cmp(&timestamp(a)));
}
