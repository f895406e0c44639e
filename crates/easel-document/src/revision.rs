//! Content revisions
//!
//! Provides [`ContentRevision`], a 32-byte Blake3 digest over a document's
//! canonical JSON encoding. Revisions are the optimistic-concurrency token
//! sent with every update publish: the backend rejects a publish whose base
//! revision no longer matches the stored document.

use crate::error::DocumentError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte content digest (Blake3 over canonical JSON)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentRevision([u8; 32]);

impl ContentRevision {
    /// Wrap raw digest bytes
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the revision of any serializable value
    ///
    /// # Errors
    /// Returns error if the value cannot be encoded as JSON
    pub fn of<T>(value: &T) -> Result<Self, DocumentError>
    where
        T: serde::Serialize,
    {
        let encoded = serde_json::to_vec(value)?;
        Ok(Self(*blake3::hash(&encoded).as_bytes()))
    }

    /// Underlying digest bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Abbreviated form for log lines (first 8 bytes, hex)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentRevision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ContentRevision {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| DocumentError::InvalidRevisionLength(b.len()))?;
        Ok(Self(arr))
    }
}

impl serde::Serialize for ContentRevision {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ContentRevision {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
