//! Roles and the capabilities they grant.
//!
//! Dashboards are not duplicated per role. Each role maps to a fixed
//! capability set, and views check capabilities rather than role names.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Who is using the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Caretaker,
    Nurse,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Caretaker => "caretaker",
            Role::Nurse => "nurse",
        }
    }

    /// The capabilities a user of this role holds.
    pub fn capabilities(self) -> CapabilitySet {
        let mut caps = CapabilitySet::default();
        match self {
            Role::Patient => caps.grant(Capability::ViewOwnSchedule),
            Role::Caretaker | Role::Nurse => caps.grant(Capability::EditRoster),
        }
        caps
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single permission checked by role-specific views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Link, add, remove, and update patients on a roster.
    EditRoster,
    /// Scan prescriptions and see one's own schedule.
    ViewOwnSchedule,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::EditRoster => "edit-roster",
            Capability::ViewOwnSchedule => "view-own-schedule",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capabilities granted to the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    inner: HashSet<Capability>,
}

impl CapabilitySet {
    pub fn grant(&mut self, capability: Capability) {
        self.inner.insert(capability);
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.inner.contains(&capability)
    }

    pub fn all(&self) -> impl Iterator<Item = &Capability> {
        self.inner.iter()
    }
}
