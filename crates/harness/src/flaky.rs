use jobbook_core::{Business, Client, Contract, Invoice, Job};
use jobbook_storage::{Snapshot, StorageError, Store};

/// A `Store` wrapper with fault-injection switches, for exercising the
/// engine's fail-closed paths without reaching into sqlite internals.
pub struct FlakyStore<S> {
    pub inner: S,
    pub fail_fetches: bool,
    pub fail_commit: bool,
}

impl<S> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_fetches: false,
            fail_commit: false,
        }
    }
}

fn unavailable() -> StorageError {
    StorageError::Unavailable("injected fault".to_string())
}

impl<S: Store> Store for FlakyStore<S> {
    fn read_version(&self) -> Result<i64, StorageError> {
        self.inner.read_version()
    }

    fn fetch_businesses(&self) -> Result<Vec<Business>, StorageError> {
        if self.fail_fetches {
            return Err(unavailable());
        }
        self.inner.fetch_businesses()
    }

    fn fetch_clients(&self) -> Result<Vec<Client>, StorageError> {
        if self.fail_fetches {
            return Err(unavailable());
        }
        self.inner.fetch_clients()
    }

    fn fetch_invoices(&self) -> Result<Vec<Invoice>, StorageError> {
        if self.fail_fetches {
            return Err(unavailable());
        }
        self.inner.fetch_invoices()
    }

    fn fetch_contracts(&self) -> Result<Vec<Contract>, StorageError> {
        if self.fail_fetches {
            return Err(unavailable());
        }
        self.inner.fetch_contracts()
    }

    fn fetch_jobs(&self) -> Result<Vec<Job>, StorageError> {
        if self.fail_fetches {
            return Err(unavailable());
        }
        self.inner.fetch_jobs()
    }

    fn commit(&mut self, snapshot: &Snapshot, new_version: i64) -> Result<(), StorageError> {
        if self.fail_commit {
            return Err(unavailable());
        }
        self.inner.commit(snapshot, new_version)
    }
}
