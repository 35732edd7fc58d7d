use jobbook_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    /// A fetch failed before any pass could run to completion. The run
    /// aborts and the ledger is unchanged.
    #[error("store read failed: {0}")]
    Read(#[source] StorageError),

    /// The final commit failed. The transaction rolled back, the ledger is
    /// unchanged, and the next launch retries the full migration.
    #[error("store write failed: {0}")]
    Write(#[source] StorageError),

    /// Defensive check failed; should never occur. Fatal to the run.
    #[error("invariant violation: {0}")]
    Invariant(String),
}
