use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use loandesk_core::access::{Permission, View, ViewAccess};
use loandesk_core::credentials::MIN_HASH_COST;
use loandesk_core::db::open_db_in_memory;
use loandesk_core::model::client::{Client, NewClient};
use loandesk_core::model::interaction::{BulkEmail, InteractionType, NewInteraction};
use loandesk_core::model::team::NewTeam;
use loandesk_core::model::validation::ValidationError;
use loandesk_core::notify::NotificationType;
use loandesk_core::repo::record_repo::Record;
use loandesk_core::session::BreakTransition;
use loandesk_core::{
    demo_seed, Collection, CrmError, CrmService, LoadStatus, ManualClock, RecordStore,
    ServiceConfig, SettingsRepository, SqliteRecordStore, StoreError, StoreResult, Theme,
};
use rusqlite::Connection;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).unwrap()
}

fn open_service<'c>(conn: &'c Connection, clock: &ManualClock) -> CrmService<SqliteRecordStore<'c>> {
    let store = SqliteRecordStore::try_new(conn).unwrap();
    let seed = demo_seed(today(), MIN_HASH_COST).unwrap();
    CrmService::open(
        store,
        ServiceConfig::fast_hashing(),
        Box::new(clock.clone()),
        seed,
    )
}

fn signed_in<'c>(
    conn: &'c Connection,
    clock: &ManualClock,
    username: &str,
) -> CrmService<SqliteRecordStore<'c>> {
    let mut service = open_service(conn, clock);
    service
        .login(username, &format!("{username}123"))
        .expect("demo login");
    service
}

fn client(service: &CrmService<SqliteRecordStore<'_>>, id: &str) -> Client {
    service.state().client(id).cloned().expect("client exists")
}

fn status_changes(service: &CrmService<SqliteRecordStore<'_>>) -> usize {
    service
        .notifications()
        .inbox()
        .iter()
        .filter(|n| n.kind == NotificationType::StatusChange)
        .count()
}

fn new_client(name: &str, assigned_to: Option<&str>) -> NewClient {
    NewClient {
        name: name.to_string(),
        loan_type: "Personal Loan".to_string(),
        lead_source: "Website".to_string(),
        requested_amount: 300_000,
        assigned_to: assigned_to.map(str::to_string),
        ..NewClient::default()
    }
}

/// Delegates to SQLite but fails any delete that touches interactions.
struct FailingInteractionDeletes<'c> {
    inner: SqliteRecordStore<'c>,
}

impl FailingInteractionDeletes<'_> {
    fn disk_full() -> StoreError {
        StoreError::InvalidData("disk full".to_string())
    }
}

impl RecordStore for FailingInteractionDeletes<'_> {
    fn get_all<T: Record>(&self) -> StoreResult<Vec<T>> {
        self.inner.get_all()
    }

    fn add<T: Record>(&self, item: &T) -> StoreResult<String> {
        self.inner.add(item)
    }

    fn put<T: Record>(&self, item: &T) -> StoreResult<String> {
        self.inner.put(item)
    }

    fn delete_item(&self, collection: Collection, id: &str) -> StoreResult<()> {
        if collection == Collection::Interactions {
            return Err(Self::disk_full());
        }
        self.inner.delete_item(collection, id)
    }

    fn delete_items(&self, keys: &[(Collection, String)]) -> StoreResult<()> {
        if keys
            .iter()
            .any(|(collection, _)| *collection == Collection::Interactions)
        {
            return Err(Self::disk_full());
        }
        self.inner.delete_items(keys)
    }

    fn bulk_add<T: Record>(&self, items: &[T]) -> StoreResult<()> {
        self.inner.bulk_add(items)
    }

    fn bulk_put<T: Record>(&self, items: &[T]) -> StoreResult<()> {
        self.inner.bulk_put(items)
    }

    fn count(&self, collection: Collection) -> StoreResult<u64> {
        self.inner.count(collection)
    }

    fn clear_db(&self) -> StoreResult<()> {
        self.inner.clear_db()
    }
}

impl SettingsRepository for FailingInteractionDeletes<'_> {
    fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get_setting(key)
    }

    fn put_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.put_setting(key, value)
    }
}

#[test]
fn open_seeds_and_loads_newest_interactions_first() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let service = open_service(&conn, &clock);

    assert_eq!(service.load_status(), LoadStatus::Loaded);
    assert_eq!(service.state().clients.len(), 6);
    let ids: Vec<&str> = service
        .state()
        .interactions
        .iter()
        .map(|interaction| interaction.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "interaction-anand-whatsapp",
            "interaction-george-email",
            "interaction-farah-call"
        ]
    );
    assert!(service.current_user().is_none());
}

#[test]
fn reopening_does_not_reseed() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    service.add_client(new_client("Leena Roy", None)).unwrap();
    drop(service);

    let service = open_service(&conn, &clock);
    assert_eq!(service.state().clients.len(), 7);
}

#[test]
fn unreadable_store_degrades_to_empty_state() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO records (collection, id, body) VALUES ('clients', 'client-x', 'not json');",
        [],
    )
    .unwrap();
    let clock = ManualClock::new(start());

    let service = open_service(&conn, &clock);
    assert_eq!(service.load_status(), LoadStatus::Degraded);
    assert!(service.state().clients.is_empty());
    assert!(service.state().users.is_empty());
}

#[test]
fn login_validates_credentials_and_status() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = open_service(&conn, &clock);

    assert!(matches!(
        service.login("  ", "admin123"),
        Err(CrmError::MissingCredentials)
    ));
    assert!(matches!(
        service.login("admin", ""),
        Err(CrmError::MissingCredentials)
    ));
    assert!(matches!(
        service.login("admin", "wrong"),
        Err(CrmError::InvalidCredentials)
    ));
    assert!(matches!(
        service.login("nobody", "nobody123"),
        Err(CrmError::InvalidCredentials)
    ));
    assert!(matches!(
        service.login("sunil", "sunil123"),
        Err(CrmError::UserInactive)
    ));
    assert!(service.state().activity_logs.is_empty());

    let user = service.login("ADMIN", "admin123").unwrap();
    assert_eq!(user.id, "user-admin");
    assert_eq!(service.state().activity_logs[0].action, "logged in");
}

#[test]
fn handlers_require_a_session() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = open_service(&conn, &clock);

    assert!(matches!(
        service.add_client(new_client("Leena Roy", None)),
        Err(CrmError::NotLoggedIn)
    ));
    assert!(matches!(service.toggle_break(), Err(CrmError::NotLoggedIn)));
    assert!(matches!(service.navigate(View::Dashboard), Err(CrmError::NotLoggedIn)));
    assert!(!service.can(Permission::ViewDashboard));
}

#[test]
fn approval_notification_fires_only_on_first_transition() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    let mut anand = client(&service, "client-anand");
    anand.loan_details.approved_amount = 5_000_000;
    service.update_client(anand.clone()).unwrap();

    assert_eq!(status_changes(&service), 1);
    assert!(service.notifications().inbox()[0]
        .message
        .contains("5,000,000"));
    assert!(service.state().activity_logs[0]
        .action
        .contains("approved amount changed from 0 to 5,000,000"));

    anand.loan_details.approved_amount = 6_000_000;
    service.update_client(anand).unwrap();
    assert_eq!(status_changes(&service), 1);
}

#[test]
fn disbursement_notification_fires_once() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    let mut george = client(&service, "client-george");
    george.loan_details.disbursed_amount = 500_000;
    service.update_client(george.clone()).unwrap();
    george.loan_details.disbursed_amount = 450_000;
    service.update_client(george).unwrap();

    let disbursed: Vec<_> = service
        .notifications()
        .inbox()
        .iter()
        .filter(|n| n.message.starts_with("Funds disbursed"))
        .collect();
    assert_eq!(disbursed.len(), 1);
    assert_eq!(disbursed[0].related_id.as_deref(), Some("client-george"));
}

#[test]
fn update_without_tracked_changes_writes_no_audit_entry() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    let before = service.state().activity_logs.len();

    let mut anand = client(&service, "client-anand");
    anand.phone = Some("+91 98450 12345".to_string());
    service.update_client(anand).unwrap();

    assert_eq!(service.state().activity_logs.len(), before);
    assert_eq!(
        client(&service, "client-anand").phone.as_deref(),
        Some("+91 98450 12345")
    );
}

#[test]
fn deleting_user_unassigns_clients_and_prunes_team() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    let unassigned = service.delete_user("user-asha").unwrap();
    assert_eq!(unassigned, 2);

    for id in ["client-anand", "client-farah"] {
        let orphan = client(&service, id);
        assert_eq!(orphan.assigned_to, None);
        assert_eq!(
            service.state().user_label(orphan.assigned_to.as_deref()),
            "Unassigned"
        );
    }
    let team = service.state().team("team-north").unwrap();
    assert!(!team.includes("user-asha"));
    assert!(service.state().user("user-asha").is_none());

    let logs = &service.state().activity_logs;
    assert_eq!(logs[0].action, "deleted user Asha Verma");
    assert_eq!(logs[1].action, "unassigned 2 clients from Asha Verma");

    let stored: Vec<Client> = SqliteRecordStore::try_new(&conn)
        .unwrap()
        .get_all()
        .unwrap();
    assert!(stored.iter().all(|client| !client.is_assigned_to("user-asha")));
}

#[test]
fn signed_in_user_cannot_delete_themselves() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    let before = service.state().clone();

    assert!(matches!(
        service.delete_user("user-admin"),
        Err(CrmError::SelfDeletion)
    ));
    assert_eq!(service.state(), &before);
    assert_eq!(
        service.current_user().map(|user| user.id.as_str()),
        Some("user-admin")
    );
}

#[test]
fn deleting_user_without_clients_skips_cascade_entry() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    let before = service.state().activity_logs.len();

    assert_eq!(service.delete_user("user-kiran").unwrap(), 0);
    assert_eq!(service.state().activity_logs.len(), before + 1);
    assert_eq!(service.state().activity_logs[0].action, "deleted user Kiran Das");
}

#[test]
fn invalid_shift_is_rejected_without_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    let logs_before = service.state().activity_logs.len();
    let original = service.state().user("user-ravi").cloned().unwrap();

    let mut ravi = original.clone();
    ravi.shift_end_time = Some("10:00".to_string());
    let err = service.update_user(ravi).expect_err("shift must be rejected");
    assert!(matches!(
        err,
        CrmError::Validation(ValidationError::ShiftEndsBeforeStart { .. })
    ));

    let mut ravi = original.clone();
    ravi.shift_start_time = Some("9am".to_string());
    assert!(matches!(
        service.update_user(ravi),
        Err(CrmError::Validation(ValidationError::InvalidShiftTime(_)))
    ));

    assert_eq!(service.state().user("user-ravi"), Some(&original));
    assert_eq!(service.state().activity_logs.len(), logs_before);
    service.reload();
    assert_eq!(service.state().user("user-ravi"), Some(&original));
}

#[test]
fn user_update_keeps_password_and_audits_changes() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    let mut ravi = service.state().user("user-ravi").cloned().unwrap();
    ravi.shift_start_time = Some("10:00".to_string());
    ravi.password_hash = String::new();
    service.update_user(ravi).unwrap();

    assert_eq!(
        service.state().activity_logs[0].action,
        "updated user Ravi Menon: shift start changed from 11:00 to 10:00"
    );
    service.logout().unwrap();
    service.login("ravi", "ravi123").expect("password kept");
}

#[test]
fn duplicate_username_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    let mut ravi = service.state().user("user-ravi").cloned().unwrap();
    ravi.username = "Asha".to_string();
    assert!(matches!(
        service.update_user(ravi),
        Err(CrmError::Validation(ValidationError::DuplicateUsername(_)))
    ));
}

#[test]
fn changed_password_is_required_on_next_login() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    service.change_password("user-asha", "s3cret").unwrap();
    assert!(matches!(
        service.change_password("user-ravi", "hijack"),
        Err(CrmError::PermissionDenied { .. })
    ));
    service.logout().unwrap();

    assert!(matches!(
        service.login("asha", "asha123"),
        Err(CrmError::InvalidCredentials)
    ));
    service.login("asha", "s3cret").unwrap();
}

#[test]
fn bulk_assign_writes_one_aggregate_entry() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    let before = service.state().activity_logs.len();

    let ids: Vec<String> = [
        "client-anand",
        "client-george",
        "client-hema",
        "client-imran",
        "client-jaya",
    ]
    .iter()
    .map(|id| id.to_string())
    .collect();
    assert_eq!(service.bulk_assign(&ids, "user-asha").unwrap(), 5);

    assert_eq!(service.state().activity_logs.len(), before + 1);
    let entry = &service.state().activity_logs[0];
    assert!(entry.action.contains('5'));
    assert!(entry.action.contains("Asha"));
    for id in &ids {
        assert!(client(&service, id).is_assigned_to("user-asha"));
    }
}

#[test]
fn bulk_assign_to_unknown_user_fails() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    let err = service
        .bulk_assign(&["client-anand".to_string()], "user-404")
        .expect_err("unknown assignee");
    assert!(matches!(
        err,
        CrmError::NotFound {
            collection: Collection::Users,
            ..
        }
    ));
}

#[test]
fn interactions_are_returned_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    let note = |notes: &str| NewInteraction {
        client_id: Some("client-anand".to_string()),
        kind: InteractionType::Call,
        subject: None,
        notes: notes.to_string(),
        attachments: Vec::new(),
    };
    service.add_interaction(note("first call")).unwrap();
    clock.advance(Duration::minutes(10));
    let latest = service.add_interaction(note("second call")).unwrap();

    let history = service.client_interactions("client-anand");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].id, latest.id);
    assert_eq!(history[1].notes, "first call");
    assert_eq!(service.state().interactions[0].id, latest.id);
    assert!(service.state().activity_logs[0]
        .action
        .starts_with("logged call with Anand Sharma"));

    service.reload();
    assert_eq!(service.client_interactions("client-anand")[0].id, latest.id);
}

#[test]
fn interaction_for_unknown_client_is_kept_without_audit() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");
    let before = service.state().activity_logs.len();

    service
        .add_interaction(NewInteraction {
            client_id: Some("client-404".to_string()),
            kind: InteractionType::Note,
            subject: None,
            notes: "orphan".to_string(),
            attachments: Vec::new(),
        })
        .unwrap();

    assert_eq!(service.state().interactions[0].notes, "orphan");
    assert_eq!(service.state().activity_logs.len(), before);
}

#[test]
fn bulk_email_logs_one_entry_per_known_client() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");
    let logs_before = service.state().activity_logs.len();

    let sent = service
        .bulk_email(BulkEmail {
            client_ids: vec![
                "client-anand".to_string(),
                "client-farah".to_string(),
                "client-404".to_string(),
            ],
            subject: "Festive rates".to_string(),
            message: "Rates drop by 25bps this month.".to_string(),
            attachments: Vec::new(),
        })
        .unwrap();

    assert_eq!(sent, 2);
    assert!(service.state().interactions[..2]
        .iter()
        .all(|interaction| interaction.kind == InteractionType::Email));
    assert_eq!(service.state().activity_logs.len(), logs_before + 1);
    assert_eq!(
        SqliteRecordStore::try_new(&conn)
            .unwrap()
            .count(Collection::Interactions)
            .unwrap(),
        5
    );
}

#[test]
fn agent_is_denied_admin_views_and_actions() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    let outcome = service.navigate(View::Users).unwrap();
    assert!(matches!(
        outcome,
        ViewAccess::AccessDenied {
            view: View::Users,
            required: Permission::ManageUsers,
        }
    ));
    assert!(service.navigate(View::Clients).unwrap().is_granted());
    assert!(!service.can(Permission::ManageUsers));

    let before = service.state().clone();
    assert!(matches!(
        service.delete_client("client-anand"),
        Err(CrmError::PermissionDenied {
            permission: Permission::DeleteClients,
            ..
        })
    ));
    assert!(matches!(
        service.reset_demo_data(),
        Err(CrmError::PermissionDenied { .. })
    ));
    assert!(matches!(
        service.activity_log(),
        Err(CrmError::PermissionDenied { .. })
    ));
    assert_eq!(service.state(), &before);
}

#[test]
fn agent_leads_are_self_assigned() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    let created = service
        .add_client(new_client("Leena Roy", Some("user-ravi")))
        .unwrap();
    assert_eq!(created.assigned_to.as_deref(), Some("user-asha"));
    assert_eq!(created.created_by, "user-asha");
    assert_eq!(created.contact_date, today());
    assert!(service.notifications().inbox().is_empty());
}

#[test]
fn trainee_lead_raises_info_notification() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "kiran");

    let created = service.add_client(new_client("Leena Roy", None)).unwrap();
    assert_eq!(created.assigned_to, None);

    let inbox = service.notifications().inbox();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationType::Info);
    assert!(inbox[0].message.contains("just a lead generated"));
    assert_eq!(service.active_toasts().len(), 1);

    clock.advance(Duration::seconds(6));
    assert!(service.active_toasts().is_empty());
    assert_eq!(service.notifications().inbox().len(), 1);
}

#[test]
fn trainee_cannot_assign_their_lead() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "kiran");

    let created = service
        .add_client(new_client("Leena Roy", Some("user-asha")))
        .unwrap();
    assert_eq!(created.assigned_to, None);
    assert_eq!(client(&service, &created.id).assigned_to, None);

    let stored: Vec<Client> = SqliteRecordStore::try_new(&conn)
        .unwrap()
        .get_all()
        .unwrap();
    let stored = stored
        .iter()
        .find(|client| client.id == created.id)
        .expect("lead persisted");
    assert_eq!(stored.assigned_to, None);
}

#[test]
fn reassigning_client_to_unknown_user_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    let before = service.state().clone();

    let mut anand = client(&service, "client-anand");
    anand.assigned_to = Some("user-ghost".to_string());
    assert!(matches!(
        service.update_client(anand),
        Err(CrmError::NotFound {
            collection: Collection::Users,
            ..
        })
    ));
    assert_eq!(service.state(), &before);

    let mut anand = client(&service, "client-anand");
    anand.assigned_to = Some("user-ravi".to_string());
    service.update_client(anand).unwrap();
    assert_eq!(
        client(&service, "client-anand").assigned_to.as_deref(),
        Some("user-ravi")
    );
}

#[test]
fn blank_client_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    let before = service.state().clone();

    assert!(matches!(
        service.add_client(new_client("   ", None)),
        Err(CrmError::Validation(ValidationError::EmptyField(_)))
    ));
    assert_eq!(service.state(), &before);
}

#[test]
fn deleting_client_removes_its_interactions() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    service.delete_client("client-farah").unwrap();

    assert!(service.state().client("client-farah").is_none());
    assert!(service.client_interactions("client-farah").is_empty());
    assert_eq!(service.state().activity_logs[0].action, "deleted client Farah Khan");
    service.reload();
    assert_eq!(service.state().interactions.len(), 2);
}

#[test]
fn failed_cascade_leaves_client_and_interactions_in_place() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let store = FailingInteractionDeletes {
        inner: SqliteRecordStore::try_new(&conn).unwrap(),
    };
    let seed = demo_seed(today(), MIN_HASH_COST).unwrap();
    let mut service = CrmService::open(
        store,
        ServiceConfig::fast_hashing(),
        Box::new(clock.clone()),
        seed,
    );
    service.login("admin", "admin123").unwrap();
    let audit_before = service.state().activity_logs.len();

    assert!(matches!(
        service.delete_client("client-farah"),
        Err(CrmError::Store(_))
    ));

    assert!(service.state().client("client-farah").is_some());
    assert_eq!(service.client_interactions("client-farah").len(), 1);
    assert_eq!(service.state().activity_logs.len(), audit_before);

    let store = SqliteRecordStore::try_new(&conn).unwrap();
    assert_eq!(store.count(Collection::Clients).unwrap(), 6);
    assert_eq!(store.count(Collection::Interactions).unwrap(), 3);
}

#[test]
fn breaks_accumulate_and_reset_on_logout() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    assert!(matches!(
        service.toggle_break().unwrap(),
        BreakTransition::Started { .. }
    ));
    clock.advance(Duration::minutes(15));
    assert_eq!(
        service.toggle_break().unwrap(),
        BreakTransition::Ended {
            seconds: 900,
            total_seconds: 900
        }
    );
    assert_eq!(
        service.state().activity_logs[0].action,
        "ended break after 00:15:00"
    );

    service.toggle_break().unwrap();
    clock.advance(Duration::minutes(5));
    let summary = service.logout().unwrap();
    assert_eq!(summary.total_break_seconds, 1200);
    assert!(service.notifications().inbox().is_empty());

    service.login("asha", "asha123").unwrap();
    assert_eq!(service.session().total_break_seconds(), 0);
    assert!(!service.session().is_on_break());
}

#[test]
fn due_reminders_are_derived_once_per_session() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    assert_eq!(service.refresh_notifications().unwrap(), 2);
    let kinds: Vec<NotificationType> = service
        .notifications()
        .inbox()
        .iter()
        .map(|n| n.kind)
        .collect();
    assert!(kinds.contains(&NotificationType::TaskDue));
    assert!(kinds.contains(&NotificationType::FollowUp));

    assert_eq!(service.refresh_notifications().unwrap(), 0);
}

#[test]
fn overdue_and_due_today_tasks_are_worded_differently() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());

    let mut service = signed_in(&conn, &clock, "ravi");
    assert_eq!(service.refresh_notifications().unwrap(), 1);
    assert_eq!(
        service.notifications().inbox()[0].message,
        "Task overdue since 2026-06-14: Share sanction letter with George"
    );
    drop(service);

    let mut service = signed_in(&conn, &clock, "asha");
    service.refresh_notifications().unwrap();
    let messages: Vec<&str> = service
        .notifications()
        .inbox()
        .iter()
        .map(|n| n.message.as_str())
        .collect();
    assert!(messages.contains(&"Task due today: Collect GST returns from Farah"));
    assert!(messages.contains(&"Follow up with Farah Khan today"));
}

#[test]
fn reminders_are_derived_again_after_relogin() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    assert_eq!(service.refresh_notifications().unwrap(), 2);
    service.logout().unwrap();
    assert!(service.notifications().inbox().is_empty());

    service.login("asha", "asha123").unwrap();
    assert_eq!(service.refresh_notifications().unwrap(), 2);
    assert_eq!(service.refresh_notifications().unwrap(), 0);
}

#[test]
fn reminders_are_derived_again_on_the_next_day() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    assert_eq!(service.refresh_notifications().unwrap(), 2);
    clock.advance(Duration::days(1));

    assert_eq!(service.refresh_notifications().unwrap(), 3);
    let inbox = service.notifications().inbox();
    assert!(inbox
        .iter()
        .any(|n| n.message == "Task overdue since 2026-06-15: Collect GST returns from Farah"));
    assert!(inbox
        .iter()
        .any(|n| n.message == "Task due today: Intro call with Anand"));
    assert_eq!(service.refresh_notifications().unwrap(), 0);
}

#[test]
fn task_completion_toggle_is_audited() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "asha");

    let task = service.toggle_task_completion("task-farah-docs").unwrap();
    assert!(task.completed);
    assert_eq!(
        service.state().activity_logs[0].action,
        "completed task \"Collect GST returns from Farah\""
    );

    service.toggle_task_completion("task-farah-docs").unwrap();
    assert!(service.state().activity_logs[0]
        .action
        .starts_with("reopened task"));

    let mut task = service.state().task("task-farah-docs").cloned().unwrap();
    task.title = "Collect ITR from Farah".to_string();
    service.update_task(task, false).unwrap();
    assert!(service.state().activity_logs[0]
        .action
        .starts_with("updated task"));
}

#[test]
fn team_membership_is_exclusive() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    let err = service
        .add_team(NewTeam {
            name: "South Desk".to_string(),
            team_lead_id: Some("user-vikram".to_string()),
            member_ids: vec!["user-asha".to_string()],
        })
        .expect_err("asha already in north desk");
    assert!(matches!(
        err,
        CrmError::TeamMembershipConflict { ref user_id, ref team_id }
            if user_id == "user-asha" && team_id == "team-north"
    ));
    assert_eq!(service.state().teams.len(), 1);

    let team = service
        .add_team(NewTeam {
            name: "South Desk".to_string(),
            team_lead_id: Some("user-vikram".to_string()),
            member_ids: Vec::new(),
        })
        .unwrap();
    assert_eq!(service.state().teams.len(), 2);
    assert_eq!(service.state().team_of("user-vikram").map(|t| &t.id), Some(&team.id));
}

#[test]
fn visibility_is_scoped_by_role() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());

    let service = signed_in(&conn, &clock, "asha");
    let visible: Vec<&str> = service
        .visible_clients()
        .unwrap()
        .iter()
        .map(|client| client.id.as_str())
        .collect();
    assert_eq!(visible, vec!["client-anand", "client-farah"]);
    drop(service);

    let service = signed_in(&conn, &clock, "priya");
    assert_eq!(service.visible_clients().unwrap().len(), 4);
    let summary = service.pipeline_summary().unwrap();
    assert_eq!(summary.total_clients, 4);
    assert_eq!(summary.disbursed_amount, 7_000_000);
    drop(service);

    let service = signed_in(&conn, &clock, "admin");
    assert_eq!(service.visible_clients().unwrap().len(), 6);
    assert_eq!(service.visible_tasks().unwrap().len(), 4);
}

#[test]
fn pipeline_totals_saturate_instead_of_overflowing() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");

    for id in ["client-anand", "client-farah"] {
        let mut huge = client(&service, id);
        huge.loan_details.requested_amount = u64::MAX;
        service.update_client(huge).unwrap();
    }

    let summary = service.pipeline_summary().unwrap();
    assert_eq!(summary.requested_amount, u64::MAX);
    assert_eq!(summary.total_clients, 6);
}

#[test]
fn reset_restores_demo_data_and_keeps_theme() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "admin");
    service.set_theme(Theme::Dark).unwrap();
    service.add_client(new_client("Leena Roy", None)).unwrap();
    service.delete_client("client-hema").unwrap();

    assert_eq!(service.reset_demo_data().unwrap(), LoadStatus::Loaded);

    assert_eq!(service.state().clients.len(), 6);
    assert!(service.state().client("client-hema").is_some());
    assert!(service.state().activity_logs.is_empty());
    assert!(service.current_user().is_none());
    assert_eq!(service.theme().unwrap(), Theme::Dark);
}

#[test]
fn documents_and_commitments_are_tracked() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(start());
    let mut service = signed_in(&conn, &clock, "priya");

    let document = service
        .add_document(loandesk_core::model::document::NewDocument {
            client_id: "client-farah".to_string(),
            file_name: "gst-returns.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            size: 42_000,
            url: "files/gst-returns.pdf".to_string(),
            password: None,
        })
        .unwrap();
    assert_eq!(service.client_documents("client-farah").len(), 1);
    assert_eq!(
        service.state().activity_logs[0].action,
        "uploaded gst-returns.pdf for Farah Khan"
    );
    service.delete_document(&document.id).unwrap();
    assert!(service.client_documents("client-farah").is_empty());

    let err = service
        .add_commitment(loandesk_core::model::commitment::NewCommitment {
            title: "Zero target".to_string(),
            user_id: None,
            target_amount: 0,
            due_date: today(),
        })
        .expect_err("zero target");
    assert!(matches!(
        err,
        CrmError::Validation(ValidationError::ZeroCommitmentTarget)
    ));

    let mut commitment = service
        .state()
        .commitment("commitment-ravi-month")
        .cloned()
        .unwrap();
    commitment.current_amount = 2_500_000;
    service.update_commitment(commitment).unwrap();
    assert_eq!(
        service.state().activity_logs[0].action,
        "updated commitment Ravi monthly sanctions: progress 2,500,000 of 5,000,000"
    );
}
