use tracing::warn;

use jobbook_core::BusinessId;
use jobbook_storage::Snapshot;

#[derive(Debug, Clone, Copy, Default)]
pub struct RepairCounts {
    pub clients: usize,
    pub invoices: usize,
    pub contracts: usize,
    pub jobs: usize,
}

impl RepairCounts {
    pub fn total(&self) -> usize {
        self.clients + self.invoices + self.contracts + self.jobs
    }
}

/// Remap every dependent whose `business_id` does not reference an existing
/// business to the default owner. Foreign keys are rewritten silently; no
/// record is ever deleted.
pub fn repair_references(snapshot: &mut Snapshot, default_owner: BusinessId) -> RepairCounts {
    let valid = snapshot.business_ids();
    let mut counts = RepairCounts::default();

    for client in &mut snapshot.clients {
        if !valid.contains(&client.business_id) {
            warn!(client = %client.id, orphaned_from = %client.business_id, "remapped dangling client");
            client.business_id = default_owner;
            counts.clients += 1;
        }
    }
    for invoice in &mut snapshot.invoices {
        if !valid.contains(&invoice.business_id) {
            warn!(invoice = %invoice.id, orphaned_from = %invoice.business_id, "remapped dangling invoice");
            invoice.business_id = default_owner;
            counts.invoices += 1;
        }
    }
    for contract in &mut snapshot.contracts {
        if !valid.contains(&contract.business_id) {
            warn!(contract = %contract.id, orphaned_from = %contract.business_id, "remapped dangling contract");
            contract.business_id = default_owner;
            counts.contracts += 1;
        }
    }
    for job in &mut snapshot.jobs {
        if !valid.contains(&job.business_id) {
            warn!(job = %job.id, orphaned_from = %job.business_id, "remapped dangling job");
            job.business_id = default_owner;
            counts.jobs += 1;
        }
    }

    counts
}
