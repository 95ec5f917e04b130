//! Stable package keys.

use serde::Serialize;
use std::fmt;

use crate::schema::PackageIdentity;

/// Canonical string identity of a package.
///
/// `"native"` for native elements, otherwise `"{type}:{name}@{version}"`.
/// Two identities are equal exactly when their keys are equal, so the key
/// is used for every grouping and equality check downstream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageKey(String);

impl PackageKey {
    /// Computes the key for a package identity.
    ///
    /// # Example
    ///
    /// ```
    /// use cuin::payload::PackageKey;
    /// use cuin::schema::PackageIdentity;
    ///
    /// let key = PackageKey::of(&PackageIdentity::external("ui", "1.0.0"));
    /// assert_eq!(key.as_str(), "external:ui@1.0.0");
    /// assert_eq!(PackageKey::of(&PackageIdentity::Native).as_str(), "native");
    /// ```
    pub fn of(identity: &PackageIdentity) -> Self {
        match identity {
            PackageIdentity::Native => PackageKey("native".to_string()),
            PackageIdentity::Internal { name, version }
            | PackageIdentity::External { name, version } => PackageKey(format!(
                "{}:{}@{}",
                identity.kind(),
                name,
                version
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&PackageIdentity> for PackageKey {
    fn from(identity: &PackageIdentity) -> Self {
        PackageKey::of(identity)
    }
}

impl PackageIdentity {
    /// Returns the stable key for this identity.
    pub fn key(&self) -> PackageKey {
        PackageKey::of(self)
    }
}
