use rusqlite::Connection;

use crate::error::StorageError;

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -32000;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

// Dependent tables carry business_id without a FOREIGN KEY constraint on
// purpose: historical data may dangle, and the migration engine repairs it
// instead of sqlite rejecting it.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS migration_ledger (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
INSERT OR IGNORE INTO migration_ledger (id, version, updated_at) VALUES (1, 0, unixepoch());

CREATE TABLE IF NOT EXISTS businesses (
    business_id BLOB PRIMARY KEY CHECK (length(business_id) = 16),
    name TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 0,
    currency TEXT NOT NULL,
    tax_rate REAL NOT NULL,
    default_template_key TEXT NOT NULL,
    payment_account_id TEXT,
    schedule TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS clients (
    client_id BLOB PRIMARY KEY CHECK (length(client_id) = 16),
    business_id BLOB NOT NULL CHECK (length(business_id) = 16),
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_clients_business ON clients (business_id);

CREATE TABLE IF NOT EXISTS invoices (
    invoice_id BLOB PRIMARY KEY CHECK (length(invoice_id) = 16),
    business_id BLOB NOT NULL CHECK (length(business_id) = 16),
    number INTEGER NOT NULL,
    status TEXT NOT NULL,
    override_template_key TEXT,
    total_cents INTEGER NOT NULL DEFAULT 0,
    issued_at INTEGER NOT NULL,
    linked_booking_id TEXT,
    pending_upload INTEGER NOT NULL DEFAULT 0,
    in_flight INTEGER NOT NULL DEFAULT 0,
    last_error TEXT,
    uploaded_at INTEGER,
    uploaded_hash TEXT,
    uploaded_location TEXT
);
CREATE INDEX IF NOT EXISTS idx_invoices_business ON invoices (business_id);

CREATE TABLE IF NOT EXISTS contracts (
    contract_id BLOB PRIMARY KEY CHECK (length(contract_id) = 16),
    business_id BLOB NOT NULL CHECK (length(business_id) = 16),
    title TEXT NOT NULL,
    status TEXT NOT NULL,
    pending_upload INTEGER NOT NULL DEFAULT 0,
    in_flight INTEGER NOT NULL DEFAULT 0,
    last_error TEXT,
    uploaded_at INTEGER,
    uploaded_hash TEXT,
    uploaded_location TEXT
);
CREATE INDEX IF NOT EXISTS idx_contracts_business ON contracts (business_id);

CREATE TABLE IF NOT EXISTS jobs (
    job_id BLOB PRIMARY KEY CHECK (length(job_id) = 16),
    business_id BLOB NOT NULL CHECK (length(business_id) = 16),
    title TEXT NOT NULL,
    stage TEXT NOT NULL,
    source_origin_id TEXT,
    start_date INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_jobs_business ON jobs (business_id);
";
