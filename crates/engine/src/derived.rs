use chrono::{DateTime, Utc};
use tracing::debug;

use jobbook_core::{Decoded, Job, JobStage};

/// A job cannot be completed before it has started if it came from an
/// automated booking flow: completed + booking origin + future start date is
/// inconsistent and gets rewound to booked. `now` is sampled once per run;
/// live enforcement of this rule belongs to normal business-logic paths.
pub fn correct_derived_state(jobs: &mut [Job], now: DateTime<Utc>) -> usize {
    let mut corrected = 0;

    for job in jobs {
        let completed = matches!(JobStage::decode(&job.stage), Decoded::Known(JobStage::Completed));
        if completed && job.has_booking_origin() && job.start_date >= now {
            debug!(job = %job.id, start = %job.start_date, "completed job has not started yet, rewound to booked");
            job.stage = JobStage::Booked.as_str().to_string();
            corrected += 1;
        }
    }

    corrected
}
