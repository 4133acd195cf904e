//! Fingerprint providers.
//!
//! - `StaticFingerprint` - a fixed id supplied by the host application
//! - `HashedFingerprint` - SHA-256 over device traits, hex encoded

use sha2::{Digest, Sha256};

use crate::domain::foundation::{Fingerprint, ValidationError};
use crate::ports::FingerprintProvider;

/// Returns the same fingerprint for every call.
#[derive(Debug, Clone)]
pub struct StaticFingerprint(Fingerprint);

impl StaticFingerprint {
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self(fingerprint)
    }
}

impl FingerprintProvider for StaticFingerprint {
    fn fingerprint(&self) -> Fingerprint {
        self.0.clone()
    }
}

/// Derives a stable fingerprint from device traits such as user agent,
/// screen size and timezone.
///
/// Traits are trimmed and joined with a unit separator before hashing, so
/// the same traits in the same order always yield the same id.
#[derive(Debug, Clone)]
pub struct HashedFingerprint(Fingerprint);

impl HashedFingerprint {
    /// Hashes the given traits; blank traits are skipped.
    pub fn from_traits<I, S>(traits: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = traits
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if parts.is_empty() {
            return Err(ValidationError::empty_field("fingerprint_traits"));
        }

        let mut hasher = Sha256::new();
        hasher.update(parts.join("\u{1f}").as_bytes());
        let digest = hex::encode(hasher.finalize());

        Ok(Self(Fingerprint::new(digest)?))
    }

    pub fn as_fingerprint(&self) -> &Fingerprint {
        &self.0
    }
}

impl FingerprintProvider for HashedFingerprint {
    fn fingerprint(&self) -> Fingerprint {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_fingerprint_is_returned_verbatim() {
        let provider = StaticFingerprint::new(Fingerprint::new("fp-123").unwrap());
        assert_eq!(provider.fingerprint().as_str(), "fp-123");
        assert_eq!(provider.fingerprint(), provider.fingerprint());
    }

    #[test]
    fn hashed_fingerprint_is_stable_hex() {
        let a = HashedFingerprint::from_traits(["Mozilla/5.0", "1920x1080", "Europe/Berlin"]).unwrap();
        let b = HashedFingerprint::from_traits(vec!["Mozilla/5.0", "1920x1080", "Europe/Berlin"]).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().as_str().len(), 64);
        assert!(a.fingerprint().as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_traits_give_different_fingerprints() {
        let a = HashedFingerprint::from_traits(["Mozilla/5.0", "1920x1080"]).unwrap();
        let b = HashedFingerprint::from_traits(["Mozilla/5.0", "1280x720"]).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn surrounding_whitespace_and_blank_traits_are_ignored() {
        let a = HashedFingerprint::from_traits(["  Mozilla/5.0 ", "", "UTC"]).unwrap();
        let b = HashedFingerprint::from_traits(["Mozilla/5.0", "UTC"]).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn no_traits_is_rejected() {
        assert!(HashedFingerprint::from_traits(Vec::<String>::new()).is_err());
        assert!(HashedFingerprint::from_traits(["  "]).is_err());
    }

    #[test]
    fn providers_are_object_safe() {
        let provider: Box<dyn FingerprintProvider> =
            Box::new(StaticFingerprint::new(Fingerprint::new("x").unwrap()));
        assert_eq!(provider.fingerprint().as_str(), "x");
    }
}
