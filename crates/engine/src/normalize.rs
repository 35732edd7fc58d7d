use tracing::debug;

use jobbook_core::{ContractStatus, Decoded, InvoiceStatus, JobStage, TemplateKey, TextEnum};
use jobbook_storage::Snapshot;

/// Policy for a required enum-backed field: substitute a safe default when
/// the stored text fails to decode, and canonicalize casing/whitespace when
/// it decodes loosely. Returns the number of rewrites (0 or 1).
fn normalize_required<T: TextEnum>(raw: &mut String, fallback: T, field: &'static str) -> usize {
    match T::decode(raw) {
        Decoded::Known(variant) => {
            if raw != variant.as_str() {
                *raw = variant.as_str().to_string();
                return 1;
            }
            0
        }
        Decoded::Invalid(old) => {
            debug!(field, from = %old, to = fallback.as_str(), "substituted default for invalid value");
            *raw = fallback.as_str().to_string();
            1
        }
    }
}

/// Policy for an optional override field: clear it when the stored text
/// fails to decode. Overrides are opt-in, so an invalid one falls back to
/// inherited behavior instead of being forced to a default.
fn normalize_override<T: TextEnum>(raw: &mut Option<String>, field: &'static str) -> usize {
    let Some(value) = raw.as_mut() else { return 0 };
    match T::decode(value) {
        Decoded::Known(variant) => {
            if value != variant.as_str() {
                *value = variant.as_str().to_string();
                return 1;
            }
            0
        }
        Decoded::Invalid(old) => {
            debug!(field, from = %old, "cleared invalid override");
            *raw = None;
            1
        }
    }
}

/// Re-validate every enum-backed-but-stored-as-text field. The body below is
/// the per-field policy table: one line per field, naming its policy and its
/// fallback. Returns the number of fields rewritten.
pub fn normalize_enums(snapshot: &mut Snapshot) -> usize {
    let mut changed = 0;

    for business in &mut snapshot.businesses {
        changed += normalize_required(
            &mut business.default_template_key,
            TemplateKey::Classic,
            "business.default_template_key",
        );
    }
    for invoice in &mut snapshot.invoices {
        changed += normalize_required(&mut invoice.status, InvoiceStatus::Draft, "invoice.status");
        changed += normalize_override::<TemplateKey>(
            &mut invoice.override_template_key,
            "invoice.override_template_key",
        );
    }
    for contract in &mut snapshot.contracts {
        changed +=
            normalize_required(&mut contract.status, ContractStatus::Draft, "contract.status");
    }
    for job in &mut snapshot.jobs {
        changed += normalize_required(&mut job.stage, JobStage::Booked, "job.stage");
    }

    changed
}
