//! Simulated data for the MedRush reference scenarios.
//!
//! All data in this module is hardcoded and fictional. No external systems
//! are contacted.

use medrush_contracts::{
    error::MedRushResult,
    medicine::{MedicineRecord, MedicineStatus},
};
use medrush_core::traits::PatientStore;

/// Stand-in for a photographed prescription: a JPEG header and nothing else.
pub const SAMPLE_IMAGE: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0xFF, 0xD9,
];

pub const PATIENT_NAME: &str = "Ravi Kumar";
pub const PATIENT_PHONE: &str = "9876543210";

pub const CARETAKER_NAME: &str = "Priya Kumar";
pub const CARETAKER_PHONE: &str = "9123456780";

pub const NURSE_NAME: &str = "Sister Lakshmi";
pub const NURSE_PHONE: &str = "9000012345";
pub const HOSPITAL_NAME: &str = "City General Hospital";

/// The relative every new caretaker account starts with.
pub const SAMPLE_RELATIVE_NAME: &str = "Anjali Sharma";
pub const SAMPLE_RELATIVE_PHONE: &str = "9988001122";
pub const SAMPLE_RELATION: &str = "Mother";

/// The walk-in patient a nurse adds during the ward scenario.
pub const WALK_IN_PHONE: &str = "9988776655";

/// The relative's current medicine list. Already marked missed.
pub fn sample_relative_medicines() -> Vec<MedicineRecord> {
    vec![MedicineRecord::new("Metformin", "500mg", "Daily", "After Breakfast")
        .with_status(MedicineStatus::Missed)]
}

/// Ward patients admitted before the nurse scenario starts: `(name, phone)`.
pub fn ward_patients() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Suresh Reddy", "9811122233"),
        ("Meena Iyer", "9822233344"),
        ("Farhan Ali", "9833344455"),
    ]
}

/// A mixed medicine list covering every time bucket and the keyword quirks.
pub fn mixed_medicines() -> Vec<MedicineRecord> {
    vec![
        MedicineRecord::new("Thyroxine", "50mcg", "Daily", "Early morning, empty stomach"),
        MedicineRecord::new("Metformin", "500mg", "Twice daily", "9am and 9pm"),
        MedicineRecord::new("Pantoprazole", "40mg", "Daily", "Before Lunch"),
        MedicineRecord::new("Amoxicillin", "250mg", "Three times", "2pm"),
        MedicineRecord::new("Atorvastatin", "10mg", "Daily", "Bedtime / night"),
        MedicineRecord::new("ORS", "1 sachet", "As needed", ""),
    ]
}

/// Put the sample relative on `caretaker_uid`'s roster and return its id.
pub fn seed_caretaker_roster(store: &dyn PatientStore, caretaker_uid: &str) -> MedRushResult<String> {
    let patient_id = store.get_or_create_patient(SAMPLE_RELATIVE_PHONE)?;
    store.rename_patient(&patient_id, SAMPLE_RELATIVE_NAME)?;
    store.link_caretaker(&patient_id, caretaker_uid, Some(SAMPLE_RELATION))?;
    store.store_prescription(&patient_id, &sample_relative_medicines(), None)?;
    Ok(patient_id)
}
