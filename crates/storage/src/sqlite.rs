use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, TransactionBehavior, params};

use jobbook_core::{
    Business, BusinessId, Client, ClientId, Contract, ContractId, Invoice, InvoiceId, Job, JobId,
    SyncState, WeekSchedule,
};

use crate::error::StorageError;
use crate::traits::{Snapshot, Store};

/// Convert Vec<u8> to fixed-size array with proper error handling.
fn to_array<const N: usize>(v: Vec<u8>, label: &str) -> Result<[u8; N], StorageError> {
    v.try_into()
        .map_err(|_| StorageError::Serialization(format!("invalid {label} length")))
}

fn from_millis(ms: i64, label: &str) -> Result<DateTime<Utc>, StorageError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StorageError::Serialization(format!("invalid {label} timestamp: {ms}")))
}

fn opt_from_millis(ms: Option<i64>, label: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
    ms.map(|v| from_millis(v, label)).transpose()
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ========================================================================
    // Application surface (used by normal CRUD paths and the test harness)
    // ========================================================================

    pub fn insert_business(&self, business: &Business) -> Result<(), StorageError> {
        upsert_business(&self.conn, business)
    }

    pub fn insert_client(&self, client: &Client) -> Result<(), StorageError> {
        upsert_client(&self.conn, client)
    }

    pub fn insert_invoice(&self, invoice: &Invoice) -> Result<(), StorageError> {
        upsert_invoice(&self.conn, invoice)
    }

    pub fn insert_contract(&self, contract: &Contract) -> Result<(), StorageError> {
        upsert_contract(&self.conn, contract)
    }

    pub fn insert_job(&self, job: &Job) -> Result<(), StorageError> {
        upsert_job(&self.conn, job)
    }
}

// ============================================================================
// Row readers
// ============================================================================

fn read_business(row: &rusqlite::Row) -> Result<Business, StorageError> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let schedule_json: String = row.get(7)?;
    Ok(Business {
        id: BusinessId::from_bytes(to_array::<16>(id_bytes, "business_id")?),
        name: row.get(1)?,
        active: row.get(2)?,
        currency: row.get(3)?,
        tax_rate: row.get(4)?,
        default_template_key: row.get(5)?,
        payment_account_id: row.get(6)?,
        schedule: WeekSchedule::from_json(&schedule_json)?,
        created_at: from_millis(row.get(8)?, "created_at")?,
    })
}

fn read_client(row: &rusqlite::Row) -> Result<Client, StorageError> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let business_bytes: Vec<u8> = row.get(1)?;
    Ok(Client {
        id: ClientId::from_bytes(to_array::<16>(id_bytes, "client_id")?),
        business_id: BusinessId::from_bytes(to_array::<16>(business_bytes, "business_id")?),
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        created_at: from_millis(row.get(5)?, "created_at")?,
    })
}

fn read_invoice(row: &rusqlite::Row) -> Result<Invoice, StorageError> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let business_bytes: Vec<u8> = row.get(1)?;
    Ok(Invoice {
        id: InvoiceId::from_bytes(to_array::<16>(id_bytes, "invoice_id")?),
        business_id: BusinessId::from_bytes(to_array::<16>(business_bytes, "business_id")?),
        number: row.get(2)?,
        status: row.get(3)?,
        override_template_key: row.get(4)?,
        total_cents: row.get(5)?,
        issued_at: from_millis(row.get(6)?, "issued_at")?,
        linked_booking_id: row.get(7)?,
        sync: SyncState {
            pending_upload: row.get(8)?,
            in_flight: row.get(9)?,
            last_error: row.get(10)?,
            uploaded_at: opt_from_millis(row.get(11)?, "uploaded_at")?,
            uploaded_hash: row.get(12)?,
            uploaded_location: row.get(13)?,
        },
    })
}

fn read_contract(row: &rusqlite::Row) -> Result<Contract, StorageError> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let business_bytes: Vec<u8> = row.get(1)?;
    Ok(Contract {
        id: ContractId::from_bytes(to_array::<16>(id_bytes, "contract_id")?),
        business_id: BusinessId::from_bytes(to_array::<16>(business_bytes, "business_id")?),
        title: row.get(2)?,
        status: row.get(3)?,
        sync: SyncState {
            pending_upload: row.get(4)?,
            in_flight: row.get(5)?,
            last_error: row.get(6)?,
            uploaded_at: opt_from_millis(row.get(7)?, "uploaded_at")?,
            uploaded_hash: row.get(8)?,
            uploaded_location: row.get(9)?,
        },
    })
}

fn read_job(row: &rusqlite::Row) -> Result<Job, StorageError> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let business_bytes: Vec<u8> = row.get(1)?;
    Ok(Job {
        id: JobId::from_bytes(to_array::<16>(id_bytes, "job_id")?),
        business_id: BusinessId::from_bytes(to_array::<16>(business_bytes, "business_id")?),
        title: row.get(2)?,
        stage: row.get(3)?,
        source_origin_id: row.get(4)?,
        start_date: from_millis(row.get(5)?, "start_date")?,
        created_at: from_millis(row.get(6)?, "created_at")?,
    })
}

// ============================================================================
// Upserts (shared between the application surface and the migration commit)
// ============================================================================

fn upsert_business(conn: &Connection, business: &Business) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO businesses
         (business_id, name, active, currency, tax_rate, default_template_key,
          payment_account_id, schedule, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            business.id.as_bytes().as_slice(),
            business.name,
            business.active,
            business.currency,
            business.tax_rate,
            business.default_template_key,
            business.payment_account_id,
            business.schedule.to_json()?,
            business.created_at.timestamp_millis(),
        ],
    )?;
    Ok(())
}

fn upsert_client(conn: &Connection, client: &Client) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO clients
         (client_id, business_id, name, email, phone, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            client.id.as_bytes().as_slice(),
            client.business_id.as_bytes().as_slice(),
            client.name,
            client.email,
            client.phone,
            client.created_at.timestamp_millis(),
        ],
    )?;
    Ok(())
}

fn upsert_invoice(conn: &Connection, invoice: &Invoice) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO invoices
         (invoice_id, business_id, number, status, override_template_key, total_cents,
          issued_at, linked_booking_id, pending_upload, in_flight, last_error,
          uploaded_at, uploaded_hash, uploaded_location)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            invoice.id.as_bytes().as_slice(),
            invoice.business_id.as_bytes().as_slice(),
            invoice.number,
            invoice.status,
            invoice.override_template_key,
            invoice.total_cents,
            invoice.issued_at.timestamp_millis(),
            invoice.linked_booking_id,
            invoice.sync.pending_upload,
            invoice.sync.in_flight,
            invoice.sync.last_error,
            invoice.sync.uploaded_at.map(|t| t.timestamp_millis()),
            invoice.sync.uploaded_hash,
            invoice.sync.uploaded_location,
        ],
    )?;
    Ok(())
}

fn upsert_contract(conn: &Connection, contract: &Contract) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO contracts
         (contract_id, business_id, title, status, pending_upload, in_flight,
          last_error, uploaded_at, uploaded_hash, uploaded_location)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            contract.id.as_bytes().as_slice(),
            contract.business_id.as_bytes().as_slice(),
            contract.title,
            contract.status,
            contract.sync.pending_upload,
            contract.sync.in_flight,
            contract.sync.last_error,
            contract.sync.uploaded_at.map(|t| t.timestamp_millis()),
            contract.sync.uploaded_hash,
            contract.sync.uploaded_location,
        ],
    )?;
    Ok(())
}

fn upsert_job(conn: &Connection, job: &Job) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO jobs
         (job_id, business_id, title, stage, source_origin_id, start_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            job.id.as_bytes().as_slice(),
            job.business_id.as_bytes().as_slice(),
            job.title,
            job.stage,
            job.source_origin_id,
            job.start_date.timestamp_millis(),
            job.created_at.timestamp_millis(),
        ],
    )?;
    Ok(())
}

impl Store for SqliteStore {
    fn read_version(&self) -> Result<i64, StorageError> {
        let version = self.conn.query_row(
            "SELECT version FROM migration_ledger WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(version)
    }

    fn fetch_businesses(&self) -> Result<Vec<Business>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT business_id, name, active, currency, tax_rate, default_template_key,
                    payment_account_id, schedule, created_at
             FROM businesses ORDER BY created_at, business_id",
        )?;
        let rows = stmt.query_and_then([], |row| read_business(row))?;
        rows.collect()
    }

    fn fetch_clients(&self) -> Result<Vec<Client>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT client_id, business_id, name, email, phone, created_at
             FROM clients ORDER BY client_id",
        )?;
        let rows = stmt.query_and_then([], |row| read_client(row))?;
        rows.collect()
    }

    fn fetch_invoices(&self) -> Result<Vec<Invoice>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT invoice_id, business_id, number, status, override_template_key,
                    total_cents, issued_at, linked_booking_id, pending_upload, in_flight,
                    last_error, uploaded_at, uploaded_hash, uploaded_location
             FROM invoices ORDER BY invoice_id",
        )?;
        let rows = stmt.query_and_then([], |row| read_invoice(row))?;
        rows.collect()
    }

    fn fetch_contracts(&self) -> Result<Vec<Contract>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT contract_id, business_id, title, status, pending_upload, in_flight,
                    last_error, uploaded_at, uploaded_hash, uploaded_location
             FROM contracts ORDER BY contract_id",
        )?;
        let rows = stmt.query_and_then([], |row| read_contract(row))?;
        rows.collect()
    }

    fn fetch_jobs(&self) -> Result<Vec<Job>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT job_id, business_id, title, stage, source_origin_id, start_date, created_at
             FROM jobs ORDER BY job_id",
        )?;
        let rows = stmt.query_and_then([], |row| read_job(row))?;
        rows.collect()
    }

    fn commit(&mut self, snapshot: &Snapshot, new_version: i64) -> Result<(), StorageError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for business in &snapshot.businesses {
            upsert_business(&tx, business)?;
        }
        for client in &snapshot.clients {
            upsert_client(&tx, client)?;
        }
        for invoice in &snapshot.invoices {
            upsert_invoice(&tx, invoice)?;
        }
        for contract in &snapshot.contracts {
            upsert_contract(&tx, contract)?;
        }
        for job in &snapshot.jobs {
            upsert_job(&tx, job)?;
        }

        // Ledger advance is part of the same transaction: there is no window
        // where the passes persist but the version does not.
        tx.execute(
            "UPDATE migration_ledger SET version = ?1, updated_at = unixepoch() WHERE id = 1",
            params![new_version],
        )?;

        tx.commit()?;
        Ok(())
    }
}
