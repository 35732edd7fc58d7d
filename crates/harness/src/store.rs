use chrono::{DateTime, Duration, Utc};

use jobbook_core::{Business, BusinessId, Client, Contract, Invoice, Job};
use jobbook_storage::{SqliteStore, StorageError};

/// An in-memory store with seeding helpers. Seeded records get strictly
/// increasing `created_at` values, so "earliest record" assertions are
/// deterministic even when a test seeds several records within one
/// millisecond.
pub struct TestStore {
    pub store: SqliteStore,
    base: DateTime<Utc>,
    seq: i64,
}

impl TestStore {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            store: SqliteStore::open_in_memory()?,
            base: Utc::now(),
            seq: 0,
        })
    }

    fn next_ts(&mut self) -> DateTime<Utc> {
        self.seq += 1;
        self.base + Duration::seconds(self.seq)
    }

    pub fn seed_business(&mut self, name: &str, active: bool) -> Result<Business, StorageError> {
        let mut business = Business::new(name);
        business.active = active;
        business.created_at = self.next_ts();
        self.store.insert_business(&business)?;
        Ok(business)
    }

    pub fn seed_client(&mut self, business_id: BusinessId) -> Result<Client, StorageError> {
        let mut client = Client::new(business_id, "Test Client");
        client.created_at = self.next_ts();
        self.store.insert_client(&client)?;
        Ok(client)
    }

    pub fn seed_invoice(&mut self, business_id: BusinessId) -> Result<Invoice, StorageError> {
        let mut invoice = Invoice::new(business_id, 1);
        invoice.issued_at = self.next_ts();
        self.store.insert_invoice(&invoice)?;
        Ok(invoice)
    }

    pub fn seed_contract(&mut self, business_id: BusinessId) -> Result<Contract, StorageError> {
        let contract = Contract::new(business_id, "Test Contract");
        self.store.insert_contract(&contract)?;
        Ok(contract)
    }

    pub fn seed_job(&mut self, business_id: BusinessId) -> Result<Job, StorageError> {
        let start = self.next_ts();
        let mut job = Job::new(business_id, "Test Job", start);
        job.created_at = start;
        self.store.insert_job(&job)?;
        Ok(job)
    }
}
