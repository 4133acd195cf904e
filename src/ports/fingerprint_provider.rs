//! Fingerprint provider port.

use crate::domain::foundation::Fingerprint;

/// Supplies the opaque, stable id that attributes responses to an
/// anonymous respondent. Synchronous; required for every submission.
pub trait FingerprintProvider: Send + Sync {
    fn fingerprint(&self) -> Fingerprint;
}
