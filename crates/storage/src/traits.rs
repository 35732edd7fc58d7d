use std::collections::BTreeSet;

use jobbook_core::{Business, BusinessId, Client, Contract, Invoice, Job};

use crate::error::StorageError;

/// Full in-memory view of the store, fetched once per migration run. Every
/// repair pass mutates this snapshot; it is also the unit of commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub businesses: Vec<Business>,
    pub clients: Vec<Client>,
    pub invoices: Vec<Invoice>,
    pub contracts: Vec<Contract>,
    pub jobs: Vec<Job>,
}

impl Snapshot {
    pub fn business_ids(&self) -> BTreeSet<BusinessId> {
        self.businesses.iter().map(|b| b.id).collect()
    }
}

/// The engine-facing contract of the entity store: fetch-all per entity
/// type, a persisted migration-ledger version, and a single-transaction
/// commit that persists a snapshot and advances the ledger together.
pub trait Store {
    fn read_version(&self) -> Result<i64, StorageError>;

    fn fetch_businesses(&self) -> Result<Vec<Business>, StorageError>;

    fn fetch_clients(&self) -> Result<Vec<Client>, StorageError>;

    fn fetch_invoices(&self) -> Result<Vec<Invoice>, StorageError>;

    fn fetch_contracts(&self) -> Result<Vec<Contract>, StorageError>;

    fn fetch_jobs(&self) -> Result<Vec<Job>, StorageError>;

    /// Persist every record in the snapshot and write the ledger version,
    /// atomically. On failure nothing is persisted and the ledger is
    /// unchanged.
    fn commit(&mut self, snapshot: &Snapshot, new_version: i64) -> Result<(), StorageError>;

    /// Fetch the full store contents. Any single fetch failure fails the
    /// whole load (fail-closed).
    fn snapshot(&self) -> Result<Snapshot, StorageError> {
        Ok(Snapshot {
            businesses: self.fetch_businesses()?,
            clients: self.fetch_clients()?,
            invoices: self.fetch_invoices()?,
            contracts: self.fetch_contracts()?,
            jobs: self.fetch_jobs()?,
        })
    }
}
