use jobbook_core::SyncState;
use jobbook_storage::Snapshot;

/// Normalize an empty-string optional to unset. Empty string is not a valid
/// "set" value anywhere in this model.
fn clear_if_empty(field: &mut Option<String>) -> bool {
    if field.as_deref() == Some("") {
        *field = None;
        return true;
    }
    false
}

fn reset_sync(sync: &mut SyncState) -> bool {
    let mut touched = false;
    if sync.pending_upload {
        sync.pending_upload = false;
        touched = true;
    }
    if sync.in_flight {
        sync.in_flight = false;
        touched = true;
    }
    if sync.last_error.is_some() {
        sync.last_error = None;
        touched = true;
    }
    touched |= clear_if_empty(&mut sync.uploaded_hash);
    touched |= clear_if_empty(&mut sync.uploaded_location);
    touched
}

/// Clear in-flight upload bookkeeping on every document. This runs on every
/// migration, not just once: a schema bump may change the sync contract, and
/// stale in-flight state must never be replayed against the new contract.
/// Returns the number of documents touched.
pub fn reset_transient_state(snapshot: &mut Snapshot) -> usize {
    let mut touched = 0;

    for invoice in &mut snapshot.invoices {
        let mut changed = reset_sync(&mut invoice.sync);
        changed |= clear_if_empty(&mut invoice.linked_booking_id);
        if changed {
            touched += 1;
        }
    }
    for contract in &mut snapshot.contracts {
        if reset_sync(&mut contract.sync) {
            touched += 1;
        }
    }

    touched
}
