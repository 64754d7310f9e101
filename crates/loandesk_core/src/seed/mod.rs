//! One-time fixture seeding of an empty record store.
//!
//! # Invariants
//! - Seeding happens only when the `clients` collection is empty.
//! - A non-empty store is never reseeded, so repeated init is idempotent.

mod demo;

pub use demo::demo_seed;

use crate::model::activity::ActivityLog;
use crate::model::client::Client;
use crate::model::commitment::Commitment;
use crate::model::document::Document;
use crate::model::interaction::Interaction;
use crate::model::task::Task;
use crate::model::team::Team;
use crate::model::user::User;
use crate::repo::record_repo::{Collection, Record, RecordStore, StoreResult};
use log::info;

/// Fixture rows for every collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    pub clients: Vec<Client>,
    pub tasks: Vec<Task>,
    pub interactions: Vec<Interaction>,
    pub activity_logs: Vec<ActivityLog>,
    pub commitments: Vec<Commitment>,
    pub documents: Vec<Document>,
}

impl SeedData {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.teams.is_empty()
            && self.clients.is_empty()
            && self.tasks.is_empty()
            && self.interactions.is_empty()
            && self.activity_logs.is_empty()
            && self.commitments.is_empty()
            && self.documents.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Fixtures were written.
    Seeded,
    /// The store already held clients; nothing was written.
    AlreadyPopulated,
}

/// Seeds every collection from `seed` when the store has no clients.
///
/// Secondary collections that already hold rows are left untouched.
pub fn init_store(store: &impl RecordStore, seed: &SeedData) -> StoreResult<SeedOutcome> {
    let existing = store.count(Collection::Clients)?;
    if existing > 0 {
        info!("event=store_seed module=seed status=skipped existing_clients={existing}");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    seed_collection(store, &seed.users)?;
    seed_collection(store, &seed.teams)?;
    seed_collection(store, &seed.clients)?;
    seed_collection(store, &seed.tasks)?;
    seed_collection(store, &seed.interactions)?;
    seed_collection(store, &seed.activity_logs)?;
    seed_collection(store, &seed.commitments)?;
    seed_collection(store, &seed.documents)?;

    info!(
        "event=store_seed module=seed status=ok users={} clients={} tasks={}",
        seed.users.len(),
        seed.clients.len(),
        seed.tasks.len()
    );
    Ok(SeedOutcome::Seeded)
}

fn seed_collection<T: Record>(store: &impl RecordStore, rows: &[T]) -> StoreResult<()> {
    if rows.is_empty() || store.count(T::COLLECTION)? > 0 {
        return Ok(());
    }
    store.bulk_add(rows)
}
