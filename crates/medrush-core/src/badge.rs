//! Status badge resolution.
//!
//! A pure lookup from a medicine's status to its localized label and one of
//! three fixed visual styles. No state transitions happen here.

use serde::{Deserialize, Serialize};

use medrush_contracts::medicine::MedicineStatus;

use crate::traits::Translations;

/// Visual category of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Pending,
    Taken,
    Missed,
}

/// A resolved badge ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub style: BadgeStyle,
}

/// Localized label for `status`.
///
/// Falls back to the raw status string when `table` has no entry for it.
pub fn resolve_label(status: MedicineStatus, table: &dyn Translations) -> String {
    table
        .lookup(status.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

pub fn badge_style(status: MedicineStatus) -> BadgeStyle {
    match status {
        MedicineStatus::Pending => BadgeStyle::Pending,
        MedicineStatus::Taken => BadgeStyle::Taken,
        MedicineStatus::Missed => BadgeStyle::Missed,
    }
}

pub fn resolve_badge(status: MedicineStatus, table: &dyn Translations) -> Badge {
    Badge {
        label: resolve_label(status, table),
        style: badge_style(status),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn label_comes_from_table() {
        let t = table(&[("taken", "लिया गया"), ("missed", "छूट गया")]);
        assert_eq!(resolve_label(MedicineStatus::Taken, &t), "लिया गया");
        assert_eq!(resolve_label(MedicineStatus::Missed, &t), "छूट गया");
    }

    #[test]
    fn missing_translation_falls_back_to_raw_status() {
        let t = table(&[("taken", "Taken")]);
        assert_eq!(resolve_label(MedicineStatus::Pending, &t), "pending");
        assert_eq!(resolve_label(MedicineStatus::Missed, &HashMap::new()), "missed");
    }

    #[test]
    fn style_follows_status() {
        assert_eq!(badge_style(MedicineStatus::Pending), BadgeStyle::Pending);
        assert_eq!(badge_style(MedicineStatus::Taken), BadgeStyle::Taken);
        assert_eq!(badge_style(MedicineStatus::Missed), BadgeStyle::Missed);
    }
}
