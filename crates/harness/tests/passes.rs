use chrono::{Duration, Utc};

use jobbook_core::{Business, BusinessId, Contract, Invoice, Job};
use jobbook_engine::{derived, normalize, transient};
use jobbook_storage::Snapshot;

fn owner() -> Business {
    let mut business = Business::new("Owner");
    business.active = true;
    business
}

// ============================================================================
// Enum normalization policy: default vs. clear
// ============================================================================

#[test]
fn invalid_required_fields_get_safe_defaults() {
    let business = owner();
    let owner_id = business.id;
    let mut invoice = Invoice::new(owner_id, 7);
    invoice.status = "bogus".to_string();
    let mut contract = Contract::new(owner_id, "Deal");
    contract.status = "ripped".to_string();
    let mut job = Job::new(owner_id, "Install", Utc::now());
    job.stage = "finished".to_string();
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        contracts: vec![contract],
        jobs: vec![job],
        ..Default::default()
    };

    let changed = normalize::normalize_enums(&mut snapshot);
    assert_eq!(changed, 3);
    assert_eq!(snapshot.invoices[0].status, "draft");
    assert_eq!(snapshot.contracts[0].status, "draft");
    assert_eq!(snapshot.jobs[0].stage, "booked");
}

#[test]
fn loose_but_valid_text_is_canonicalized() {
    let mut business = owner();
    business.default_template_key = " Professional ".to_string();
    let mut invoice = Invoice::new(business.id, 1);
    invoice.status = "PAID".to_string();
    invoice.override_template_key = Some(" Minimal ".to_string());
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        ..Default::default()
    };

    normalize::normalize_enums(&mut snapshot);
    assert_eq!(snapshot.businesses[0].default_template_key, "professional");
    assert_eq!(snapshot.invoices[0].status, "paid");
    // A decodable override is kept, only canonicalized.
    assert_eq!(
        snapshot.invoices[0].override_template_key.as_deref(),
        Some("minimal")
    );
}

#[test]
fn invalid_override_is_cleared_never_defaulted() {
    let business = owner();
    let mut invoice = Invoice::new(business.id, 2);
    invoice.override_template_key = Some("bogus".to_string());
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        ..Default::default()
    };

    normalize::normalize_enums(&mut snapshot);
    assert_eq!(snapshot.invoices[0].override_template_key, None);
}

#[test]
fn absent_override_stays_absent() {
    let business = owner();
    let invoice = Invoice::new(business.id, 3);
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        ..Default::default()
    };

    let changed = normalize::normalize_enums(&mut snapshot);
    assert_eq!(changed, 0);
    assert_eq!(snapshot.invoices[0].override_template_key, None);
}

// ============================================================================
// Transient state reset
// ============================================================================

#[test]
fn sync_flags_forced_clear_on_documents() {
    let business = owner();
    let mut invoice = Invoice::new(business.id, 4);
    invoice.sync.pending_upload = true;
    invoice.sync.in_flight = true;
    invoice.sync.last_error = Some("timeout".to_string());
    let mut contract = Contract::new(business.id, "Deal");
    contract.sync.in_flight = true;
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        contracts: vec![contract],
        ..Default::default()
    };

    let touched = transient::reset_transient_state(&mut snapshot);
    assert_eq!(touched, 2);
    let sync = &snapshot.invoices[0].sync;
    assert!(!sync.pending_upload);
    assert!(!sync.in_flight);
    assert_eq!(sync.last_error, None);
    assert!(!snapshot.contracts[0].sync.in_flight);
}

#[test]
fn empty_string_optionals_become_unset() {
    let business = owner();
    let mut invoice = Invoice::new(business.id, 5);
    invoice.sync.uploaded_hash = Some(String::new());
    invoice.sync.uploaded_location = Some(String::new());
    invoice.linked_booking_id = Some(String::new());
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        ..Default::default()
    };

    transient::reset_transient_state(&mut snapshot);
    let invoice = &snapshot.invoices[0];
    assert_eq!(invoice.sync.uploaded_hash, None);
    assert_eq!(invoice.sync.uploaded_location, None);
    assert_eq!(invoice.linked_booking_id, None);
}

#[test]
fn real_upload_metadata_survives_reset() {
    let business = owner();
    let uploaded_at = Utc::now() - Duration::hours(2);
    let mut invoice = Invoice::new(business.id, 6);
    invoice.sync.pending_upload = true;
    invoice.sync.uploaded_at = Some(uploaded_at);
    invoice.sync.uploaded_hash = Some("abc123".to_string());
    invoice.sync.uploaded_location = Some("archive/invoices/6.pdf".to_string());
    invoice.linked_booking_id = Some("booking-9".to_string());
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        ..Default::default()
    };

    transient::reset_transient_state(&mut snapshot);
    let invoice = &snapshot.invoices[0];
    assert!(!invoice.sync.pending_upload);
    assert_eq!(invoice.sync.uploaded_at, Some(uploaded_at));
    assert_eq!(invoice.sync.uploaded_hash.as_deref(), Some("abc123"));
    assert_eq!(
        invoice.sync.uploaded_location.as_deref(),
        Some("archive/invoices/6.pdf")
    );
    assert_eq!(invoice.linked_booking_id.as_deref(), Some("booking-9"));
}

// ============================================================================
// Derived job-stage correction
// ============================================================================

fn booked_origin_job(stage: &str, start_offset_days: i64) -> (Job, chrono::DateTime<Utc>) {
    let now = Utc::now();
    let mut job = Job::new(BusinessId::new(), "Gig", now + Duration::days(start_offset_days));
    job.stage = stage.to_string();
    job.source_origin_id = Some("booking-42".to_string());
    (job, now)
}

#[test]
fn completed_future_booking_job_rewound_to_booked() {
    let (job, now) = booked_origin_job("completed", 1);
    let mut jobs = vec![job];

    let corrected = derived::correct_derived_state(&mut jobs, now);
    assert_eq!(corrected, 1);
    assert_eq!(jobs[0].stage, "booked");
}

#[test]
fn completed_past_job_stays_completed() {
    let (job, now) = booked_origin_job("completed", -1);
    let mut jobs = vec![job];

    let corrected = derived::correct_derived_state(&mut jobs, now);
    assert_eq!(corrected, 0);
    assert_eq!(jobs[0].stage, "completed");
}

#[test]
fn future_job_without_booking_origin_is_left_alone() {
    let (mut job, now) = booked_origin_job("completed", 1);
    job.source_origin_id = None;
    let mut no_origin = vec![job];
    assert_eq!(derived::correct_derived_state(&mut no_origin, now), 0);
    assert_eq!(no_origin[0].stage, "completed");

    // Empty string is not a valid "set" origin either.
    let (mut job, now) = booked_origin_job("completed", 1);
    job.source_origin_id = Some(String::new());
    let mut empty_origin = vec![job];
    assert_eq!(derived::correct_derived_state(&mut empty_origin, now), 0);
    assert_eq!(empty_origin[0].stage, "completed");
}

#[test]
fn non_completed_stages_are_never_corrected() {
    for stage in ["booked", "in_progress", "canceled"] {
        let (job, now) = booked_origin_job(stage, 1);
        let mut jobs = vec![job];
        assert_eq!(derived::correct_derived_state(&mut jobs, now), 0);
        assert_eq!(jobs[0].stage, stage);
    }
}

// ============================================================================
// Combined scenario from the sync-contract change
// ============================================================================

#[test]
fn bogus_override_cleared_and_pending_upload_forced_false() {
    let business = owner();
    let mut invoice = Invoice::new(business.id, 8);
    invoice.override_template_key = Some("bogus".to_string());
    invoice.sync.pending_upload = true;
    let mut snapshot = Snapshot {
        businesses: vec![business],
        invoices: vec![invoice],
        ..Default::default()
    };

    normalize::normalize_enums(&mut snapshot);
    transient::reset_transient_state(&mut snapshot);

    let invoice = &snapshot.invoices[0];
    assert_eq!(invoice.override_template_key, None);
    assert!(!invoice.sync.pending_upload);
}
