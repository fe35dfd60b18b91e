// Calendar source for payment-date validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supplies "today" to the workflow engine
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Which calendar the system clock reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockZone {
    /// The operator's local calendar date
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: ClockZone,
}

impl SystemClock {
    pub fn new(zone: ClockZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> ClockZone {
        self.zone
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.zone {
            ClockZone::Local => chrono::Local::now().date_naive(),
            ClockZone::Utc => chrono::Utc::now().date_naive(),
        }
    }
}

/// A clock pinned to one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_zone_deserializes_lowercase() {
        let zone: ClockZone = serde_json::from_str("\"utc\"").unwrap();
        assert_eq!(zone, ClockZone::Utc);
        assert_eq!(SystemClock::default().zone(), ClockZone::Local);
    }
}
