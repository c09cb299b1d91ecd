//! Time-of-day schedule classifier.
//!
//! Each record's free-text `time` is lower-cased and tested against three
//! keyword lists, in the fixed order morning → afternoon → evening. The first
//! list with any keyword that occurs as a substring wins; a record matching
//! none lands in `other`.
//!
//! The tests are plain substring checks, not word matches. "am" therefore
//! matches inside unrelated words, and "2pm" is an evening time because no
//! afternoon keyword occurs in it. Changing this changes which bucket users
//! see their medicines in.

use medrush_contracts::{
    medicine::MedicineRecord,
    schedule::{Schedule, TimeBucket},
};

/// Substrings that place a record in the morning bucket.
pub const MORNING_KEYWORDS: &[&str] = &["morning", "breakfast", "am", "day"];

/// Substrings that place a record in the afternoon bucket.
pub const AFTERNOON_KEYWORDS: &[&str] = &["afternoon", "lunch", "noon"];

/// Substrings that place a record in the evening bucket.
pub const EVENING_KEYWORDS: &[&str] = &["evening", "dinner", "night", "pm"];

/// Keyword lists in precedence order.
const RULES: [(TimeBucket, &[&str]); 3] = [
    (TimeBucket::Morning, MORNING_KEYWORDS),
    (TimeBucket::Afternoon, AFTERNOON_KEYWORDS),
    (TimeBucket::Evening, EVENING_KEYWORDS),
];

/// Bucket for a single free-text time. Empty text is `Other`.
pub fn bucket_for(time: &str) -> TimeBucket {
    let lowered = time.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(bucket, _)| *bucket)
        .unwrap_or(TimeBucket::Other)
}

/// Partition `records` into the four buckets.
///
/// Every record appears in exactly one bucket, in input order. Status is
/// copied through untouched. Pure: identical input gives identical output.
pub fn classify(records: &[MedicineRecord]) -> Schedule {
    let mut schedule = Schedule::default();
    for record in records {
        schedule
            .bucket_mut(bucket_for(&record.time))
            .items
            .push(record.clone());
    }
    schedule
}

#[cfg(test)]
mod tests {
    use medrush_contracts::medicine::MedicineStatus;

    use super::*;

    fn rec(name: &str, time: &str) -> MedicineRecord {
        MedicineRecord::new(name, "10mg", "daily", time)
    }

    fn names(items: &[MedicineRecord]) -> Vec<&str> {
        items.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn mixed_prescription_lands_in_literal_buckets() {
        let input = vec![
            rec("rec0", "After Breakfast"),
            rec("rec1", "2pm"),
            rec("rec2", "9 PM"),
            rec("rec3", ""),
        ];

        let schedule = classify(&input);

        assert_eq!(names(&schedule.morning.items), vec!["rec0"]);
        // "2pm" has no afternoon keyword, only "pm".
        assert!(schedule.afternoon.is_empty());
        assert_eq!(names(&schedule.evening.items), vec!["rec1", "rec2"]);
        assert_eq!(names(&schedule.other.items), vec!["rec3"]);
    }

    #[test]
    fn every_record_lands_in_exactly_one_bucket() {
        let input: Vec<MedicineRecord> = [
            "morning", "Lunch", "night", "", "as needed", "9am and 9pm", "noon", "dinner",
            "dinner", "weekly", "MONDAY",
        ]
        .iter()
        .enumerate()
        .map(|(i, t)| rec(&format!("m{i}"), t))
        .collect();

        let schedule = classify(&input);
        assert_eq!(schedule.total(), input.len());

        let mut seen: Vec<&str> = schedule
            .buckets()
            .iter()
            .flat_map(|b| b.items.iter().map(|m| m.name.as_str()))
            .collect();
        seen.sort();
        let mut expected: Vec<String> = input.iter().map(|m| m.name.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn order_within_bucket_follows_input() {
        let input = vec![
            rec("first", "night"),
            rec("morning-one", "morning"),
            rec("second", "after dinner"),
            rec("third", "8 pm"),
        ];
        let schedule = classify(&input);
        assert_eq!(names(&schedule.evening.items), vec!["first", "second", "third"]);
    }

    #[test]
    fn classify_is_idempotent() {
        let input = vec![rec("a", "Morning"), rec("b", "lunch"), rec("c", "bedtime")];
        assert_eq!(classify(&input), classify(&input));
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(bucket_for("MORNING"), bucket_for("morning"));
        assert_eq!(bucket_for("AFTER LUNCH"), TimeBucket::Afternoon);
        assert_eq!(bucket_for("Before Dinner"), TimeBucket::Evening);
    }

    #[test]
    fn morning_wins_over_evening() {
        assert_eq!(bucket_for("9am and 9pm"), TimeBucket::Morning);
    }

    #[test]
    fn morning_wins_over_afternoon() {
        // "afternoon" itself contains no morning keyword, but "midday" does ("day").
        assert_eq!(bucket_for("midday after lunch"), TimeBucket::Morning);
        assert_eq!(bucket_for("afternoon"), TimeBucket::Afternoon);
    }

    #[test]
    fn substring_false_positives_are_kept() {
        // "am" inside "Vitamin" style words and "day" inside weekday names.
        assert_eq!(bucket_for("with vitamins"), TimeBucket::Morning);
        assert_eq!(bucket_for("every Sunday"), TimeBucket::Morning);
        // "pm" inside an unrelated word.
        assert_eq!(bucket_for("upmost care"), TimeBucket::Evening);
    }

    #[test]
    fn empty_or_unmatched_time_is_other() {
        assert_eq!(bucket_for(""), TimeBucket::Other);
        assert_eq!(bucket_for("as needed"), TimeBucket::Other);
        assert_eq!(bucket_for("   "), TimeBucket::Other);
    }

    #[test]
    fn empty_input_gives_four_empty_buckets() {
        let schedule = classify(&[]);
        assert!(schedule.buckets().iter().all(|b| b.is_empty()));
    }

    #[test]
    fn identical_times_are_not_deduplicated() {
        let input = vec![rec("x", "night"), rec("x", "night")];
        assert_eq!(classify(&input).evening.count(), 2);
    }

    #[test]
    fn status_is_carried_through_untouched() {
        let input = vec![
            rec("a", "morning").with_status(MedicineStatus::Missed),
            rec("b", "night").with_status(MedicineStatus::Taken),
        ];
        let schedule = classify(&input);
        assert_eq!(schedule.morning.items[0].status, MedicineStatus::Missed);
        assert_eq!(schedule.evening.items[0].status, MedicineStatus::Taken);
    }
}
