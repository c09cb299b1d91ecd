//! Time-of-day schedule types.
//!
//! A `Schedule` is a derived, throwaway projection of the current medicine
//! list. It is rebuilt on every render and never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::medicine::{MedicineRecord, MedicineStatus};

/// One of the four fixed time-of-day groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Other,
}

impl TimeBucket {
    /// Display order of the buckets.
    pub const ORDER: [TimeBucket; 4] = [
        TimeBucket::Morning,
        TimeBucket::Afternoon,
        TimeBucket::Evening,
        TimeBucket::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Evening => "evening",
            TimeBucket::Other => "other",
        }
    }

    /// Locale-table key of the bucket heading.
    ///
    /// The catch-all bucket is labelled "others" in every locale table.
    pub fn label_key(self) -> &'static str {
        match self {
            TimeBucket::Other => "others",
            timed => timed.as_str(),
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The records that fell into a single bucket, in extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBucket {
    pub label: TimeBucket,
    pub items: Vec<MedicineRecord>,
}

impl ScheduleBucket {
    pub fn new(label: TimeBucket) -> Self {
        Self { label, items: Vec::new() }
    }

    /// Number of records in the bucket.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Per-status tally across a whole schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub taken: usize,
    pub missed: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: MedicineStatus) {
        match status {
            MedicineStatus::Pending => self.pending += 1,
            MedicineStatus::Taken => self.taken += 1,
            MedicineStatus::Missed => self.missed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.taken + self.missed
    }
}

/// A medicine list partitioned into the four time-of-day buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub morning: ScheduleBucket,
    pub afternoon: ScheduleBucket,
    pub evening: ScheduleBucket,
    pub other: ScheduleBucket,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            morning: ScheduleBucket::new(TimeBucket::Morning),
            afternoon: ScheduleBucket::new(TimeBucket::Afternoon),
            evening: ScheduleBucket::new(TimeBucket::Evening),
            other: ScheduleBucket::new(TimeBucket::Other),
        }
    }
}

impl Schedule {
    pub fn bucket(&self, label: TimeBucket) -> &ScheduleBucket {
        match label {
            TimeBucket::Morning => &self.morning,
            TimeBucket::Afternoon => &self.afternoon,
            TimeBucket::Evening => &self.evening,
            TimeBucket::Other => &self.other,
        }
    }

    pub fn bucket_mut(&mut self, label: TimeBucket) -> &mut ScheduleBucket {
        match label {
            TimeBucket::Morning => &mut self.morning,
            TimeBucket::Afternoon => &mut self.afternoon,
            TimeBucket::Evening => &mut self.evening,
            TimeBucket::Other => &mut self.other,
        }
    }

    /// The four buckets in display order.
    pub fn buckets(&self) -> [&ScheduleBucket; 4] {
        [&self.morning, &self.afternoon, &self.evening, &self.other]
    }

    /// Total number of records across all buckets.
    pub fn total(&self) -> usize {
        self.buckets().iter().map(|b| b.count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Tally of medicine statuses across every bucket.
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for bucket in self.buckets() {
            for item in &bucket.items {
                counts.record(item.status);
            }
        }
        counts
    }
}
