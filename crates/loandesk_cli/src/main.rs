//! LoanDesk command-line probe.
//!
//! # Responsibility
//! - Open (and seed on first run) a workspace database.
//! - Optionally sign in and print the pipeline and due reminders.
//!
//! Usage: `loandesk_cli <db-path> [<username> <password>]`

use loandesk_core::credentials::MIN_HASH_COST;
use loandesk_core::notify::Notification;
use loandesk_core::{
    demo_seed, init_logging_from_env, open_db, Clock, CrmService, LoadStatus, ServiceConfig,
    SqliteRecordStore, SystemClock,
};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = init_logging_from_env() {
        eprintln!("logging disabled: {err}");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(db_path) = args.first() else {
        eprintln!("usage: loandesk_cli <db-path> [<username> <password>]");
        return ExitCode::from(2);
    };

    match run(db_path, args.get(1), args.get(2)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str, username: Option<&String>, password: Option<&String>) -> Result<(), String> {
    println!("loandesk_core version={}", loandesk_core::core_version());

    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let store = SqliteRecordStore::try_new(&conn).map_err(|err| err.to_string())?;
    let config = ServiceConfig::default();
    // Demo fixtures carry published passwords; hash them at the minimum cost.
    let seed = demo_seed(SystemClock.today(), MIN_HASH_COST).map_err(|err| err.to_string())?;

    let mut service = CrmService::open(store, config, Box::new(SystemClock), seed);
    if service.load_status() == LoadStatus::Degraded {
        println!("warning: workspace could not be loaded; running with empty state");
    }
    let state = service.state();
    println!(
        "clients={} tasks={} users={} teams={}",
        state.clients.len(),
        state.tasks.len(),
        state.users.len(),
        state.teams.len()
    );

    let (Some(username), Some(password)) = (username, password) else {
        return Ok(());
    };
    let user = service
        .login(username, password)
        .map_err(|err| err.to_string())?;
    println!("signed in as {} ({})", user.name, user.role);

    let summary = service.pipeline_summary().map_err(|err| err.to_string())?;
    for (status, count) in &summary.by_status {
        println!("  {:<10} {count}", status.as_str());
    }
    println!(
        "  requested={} approved={} disbursed={}",
        summary.requested_amount, summary.approved_amount, summary.disbursed_amount
    );

    service
        .refresh_notifications()
        .map_err(|err| err.to_string())?;
    service
        .notifications()
        .inbox()
        .iter()
        .for_each(print_notification);

    service.logout().map_err(|err| err.to_string())?;
    Ok(())
}

fn print_notification(notification: &Notification) {
    println!("  [{}] {}", notification.kind, notification.message);
}
