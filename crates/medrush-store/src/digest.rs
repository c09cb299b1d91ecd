//! Content addressing for uploaded prescription images.
//!
//! An image is stored under `prescriptions/{patient_id}/{sha256}.jpg`, where
//! the digest is the lowercase hex SHA-256 of the raw bytes. Uploading the
//! same bytes twice for one patient yields the same reference.

use sha2::{Digest, Sha256};

/// Lowercase 64-character hex SHA-256 of `bytes`.
pub fn image_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Storage reference for an image belonging to `patient_id`.
pub fn image_ref(patient_id: &str, bytes: &[u8]) -> String {
    format!("prescriptions/{}/{}.jpg", patient_id, image_digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_input_is_known_value() {
        assert_eq!(
            image_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn reference_is_scoped_by_patient() {
        let a = image_ref("p1", b"jpeg");
        let b = image_ref("p2", b"jpeg");
        assert!(a.starts_with("prescriptions/p1/"));
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b);
        assert_eq!(a, image_ref("p1", b"jpeg"));
    }

    #[test]
    fn different_bytes_give_different_refs() {
        assert_ne!(image_ref("p1", &[1, 2, 3]), image_ref("p1", &[1, 2, 4]));
    }
}
