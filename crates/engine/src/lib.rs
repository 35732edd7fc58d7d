pub mod derived;
pub mod error;
pub mod normalize;
pub mod owner;
pub mod repair;
pub mod transient;

pub use error::MigrationError;
pub use owner::{OwnerDefaults, OwnerResolution};
pub use repair::RepairCounts;

use chrono::{DateTime, Utc};
use tracing::{error, info, info_span};

use jobbook_storage::Store;

/// Last migration version in the pass history. Bump whenever a new pass is
/// added.
///
///   1: active-owner resolution + referential repair
///   2: enum normalization
///   3: transient sync-state reset
///   4: derived job-stage correction
pub const CURRENT_MIGRATION_VERSION: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The ledger is already at or past the target version; nothing was read
    /// or written.
    Skipped { version: i64 },
    Applied { report: MigrationReport },
}

/// Per-pass change counts for one applied run. Logged by the caller and
/// asserted on in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: i64,
    pub to_version: i64,
    pub owner_created: bool,
    pub owner_activated: bool,
    pub owners_deactivated: usize,
    pub references_repaired: usize,
    pub enums_normalized: usize,
    pub documents_reset: usize,
    pub jobs_corrected: usize,
}

/// One migration run: version gate, repair passes over a single in-memory
/// snapshot, then one atomic commit that also advances the ledger.
///
/// Callers must externally serialize runs; the engine holds no lock of its
/// own. Every pass is idempotent on already-correct data, so a crash before
/// the commit simply causes a full retry on the next launch.
pub struct Migrator {
    target_version: i64,
    defaults: OwnerDefaults,
    now: Option<DateTime<Utc>>,
}

impl Migrator {
    pub fn new() -> Self {
        Self {
            target_version: CURRENT_MIGRATION_VERSION,
            defaults: OwnerDefaults::default(),
            now: None,
        }
    }

    /// Override the target version (tests; the gate compares against this).
    pub fn with_target(mut self, version: i64) -> Self {
        self.target_version = version;
        self
    }

    pub fn with_defaults(mut self, defaults: OwnerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Pin the clock used by the derived-state pass (tests).
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn run<S: Store>(&self, store: &mut S) -> Result<MigrationOutcome, MigrationError> {
        let last = store.read_version().map_err(MigrationError::Read)?;
        if last >= self.target_version {
            info!(version = last, "store already migrated, skipping");
            return Ok(MigrationOutcome::Skipped { version: last });
        }

        let span = info_span!("migration", from = last, to = self.target_version);
        let _entered = span.enter();
        let now = self.now.unwrap_or_else(Utc::now);

        let mut snapshot = store.snapshot().map_err(MigrationError::Read)?;

        let resolution =
            owner::resolve_active_owner(&mut snapshot.businesses, &self.defaults, now);
        let active = snapshot.businesses.iter().filter(|b| b.active).count();
        if active != 1 {
            error!(active, "owner resolver postcondition failed");
            return Err(MigrationError::Invariant(format!(
                "expected exactly one active business after resolution, found {active}"
            )));
        }

        let repairs = repair::repair_references(&mut snapshot, resolution.default_owner);
        let normalized = normalize::normalize_enums(&mut snapshot);
        let reset = transient::reset_transient_state(&mut snapshot);
        let corrected = derived::correct_derived_state(&mut snapshot.jobs, now);

        store
            .commit(&snapshot, self.target_version)
            .map_err(MigrationError::Write)?;

        let report = MigrationReport {
            from_version: last,
            to_version: self.target_version,
            owner_created: resolution.created,
            owner_activated: resolution.activated,
            owners_deactivated: resolution.deactivated,
            references_repaired: repairs.total(),
            enums_normalized: normalized,
            documents_reset: reset,
            jobs_corrected: corrected,
        };
        info!(?report, "migration applied");
        Ok(MigrationOutcome::Applied { report })
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Launch-sequencer entry point. A failure here is a non-fatal startup
/// warning for the caller: the application still opens, and migration
/// retries on the next launch.
pub fn run_if_needed<S: Store>(store: &mut S) -> Result<MigrationOutcome, MigrationError> {
    Migrator::new().run(store)
}
