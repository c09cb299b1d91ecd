//! Display-ready rendering of a schedule.
//!
//! Produces one section per bucket with a localized heading, an item count,
//! and per-medicine lines with status badges. The three timed buckets always
//! render, with an empty-state line when they have no items; the catch-all
//! bucket renders only when it has items.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use medrush_contracts::{
    medicine::MedicineRecord,
    schedule::{Schedule, ScheduleBucket, TimeBucket},
};

use crate::{
    badge::{resolve_badge, Badge},
    traits::Translations,
};

/// One rendered medicine line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedItem {
    /// First character of the name, shown as an avatar.
    pub initial: String,
    pub name: String,
    /// "dosage • frequency".
    pub detail: String,
    pub timing: String,
    pub badge: Badge,
}

/// One rendered bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub bucket: TimeBucket,
    pub heading: String,
    pub count: usize,
    pub items: Vec<RenderedItem>,
    /// Shown instead of items when the bucket is empty.
    pub empty_line: Option<String>,
}

impl RenderedSection {
    pub fn count_line(&self) -> String {
        format!("{} Items", self.count)
    }
}

fn render_item(record: &MedicineRecord, table: &dyn Translations) -> RenderedItem {
    RenderedItem {
        initial: record.name.chars().next().map(String::from).unwrap_or_default(),
        name: record.name.clone(),
        detail: format!("{} • {}", record.dosage, record.frequency),
        timing: record.time.clone(),
        badge: resolve_badge(record.status, table),
    }
}

fn render_bucket(bucket: &ScheduleBucket, table: &dyn Translations) -> RenderedSection {
    let key = bucket.label.label_key();
    let empty_line = bucket
        .is_empty()
        .then(|| format!("No medicines scheduled for {}", bucket.label));
    RenderedSection {
        bucket: bucket.label,
        heading: table.lookup(key).unwrap_or(key).to_string(),
        count: bucket.count(),
        items: bucket.items.iter().map(|m| render_item(m, table)).collect(),
        empty_line,
    }
}

/// Render `schedule` into display sections, in bucket order.
pub fn render_schedule(schedule: &Schedule, table: &dyn Translations) -> Vec<RenderedSection> {
    schedule
        .buckets()
        .into_iter()
        .filter(|b| b.label != TimeBucket::Other || !b.is_empty())
        .map(|b| render_bucket(b, table))
        .collect()
}

/// Plain-text layout of rendered sections, as printed by the CLI.
pub fn sections_to_text(sections: &[RenderedSection]) -> String {
    let mut out = String::new();
    for section in sections {
        let _ = writeln!(out, "{} ({})", section.heading, section.count_line());
        if let Some(empty) = &section.empty_line {
            let _ = writeln!(out, "    {empty}");
        }
        for item in &section.items {
            let _ = writeln!(
                out,
                "  [{}] {:<20} {:<24} {:<18} {}",
                item.initial, item.name, item.detail, item.timing, item.badge.label
            );
        }
        out.push('\n');
    }
    out
}
