use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Opening hours for one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }
}

/// Weekly business-hours defaults for a business. Indexed Monday first;
/// `None` means closed that day. Persisted as a JSON text column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub days: [Option<DayWindow>; 7],
}

impl WeekSchedule {
    /// Monday through Friday, 09:00 to 17:00.
    pub fn standard_business_hours() -> Self {
        let open = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
        let close = NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default();
        let window = Some(DayWindow::new(open, close));
        Self {
            days: [window, window, window, window, window, None, None],
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

impl Default for WeekSchedule {
    fn default() -> Self {
        Self::standard_business_hours()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_hours_weekdays_only() {
        let schedule = WeekSchedule::standard_business_hours();
        for day in &schedule.days[..5] {
            assert!(day.is_some());
        }
        assert!(schedule.days[5].is_none());
        assert!(schedule.days[6].is_none());
    }

    #[test]
    fn json_roundtrip() {
        let schedule = WeekSchedule::standard_business_hours();
        let json = schedule.to_json().unwrap();
        let recovered = WeekSchedule::from_json(&json).unwrap();
        assert_eq!(schedule, recovered);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(WeekSchedule::from_json("{not json").is_err());
    }
}
