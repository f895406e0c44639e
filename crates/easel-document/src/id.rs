//! File identifiers
//!
//! Provides [`FileId`], a non-zero signed identifier where positive ids
//! denote backend-persisted files and negative ids denote virtual drafts
//! that exist only in client state until first publish.

use crate::error::DocumentError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// A non-zero file identifier
///
/// Positive = persisted by the backend. Negative = virtual draft awaiting
/// its first publish. Zero is reserved and rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(i64);

impl FileId {
    /// Create a new id from a raw value
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidId`] if `raw` is zero
    #[inline]
    pub fn new(raw: i64) -> Result<Self, DocumentError> {
        if raw == 0 {
            return Err(DocumentError::InvalidId(raw));
        }
        Ok(Self(raw))
    }

    /// Raw signed value
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// True for drafts that have never been published
    #[inline]
    #[must_use]
    pub const fn is_virtual(self) -> bool {
        self.0 < 0
    }

    /// True for files known to the backend
    #[inline]
    #[must_use]
    pub const fn is_persisted(self) -> bool {
        self.0 > 0
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s.parse().map_err(|_| DocumentError::InvalidId(0))?;
        Self::new(raw)
    }
}

impl serde::Serialize for FileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for FileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Allocator for virtual draft ids
///
/// Hands out strictly decreasing negative ids, so drafts created in one
/// client process never collide with each other.
#[derive(Debug)]
pub struct DraftIds {
    next: AtomicI64,
}

impl DraftIds {
    /// Create a fresh allocator starting at `-1`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(-1),
        }
    }

    /// Allocate the next virtual id
    #[inline]
    #[must_use]
    pub fn allocate(&self) -> FileId {
        FileId(self.next.fetch_sub(1, Ordering::Relaxed))
    }
}

impl Default for DraftIds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_id_rejects_zero() {
        assert!(matches!(FileId::new(0), Err(DocumentError::InvalidId(0))));
    }

    #[test]
    fn file_id_virtual_vs_persisted() {
        let draft = FileId::new(-3).unwrap();
        assert!(draft.is_virtual());
        assert!(!draft.is_persisted());

        let real = FileId::new(42).unwrap();
        assert!(real.is_persisted());
        assert!(!real.is_virtual());
    }

    #[test]
    fn file_id_parse_roundtrip() {
        let id = FileId::new(17).unwrap();
        let parsed: FileId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn file_id_serde_rejects_zero() {
        let result: Result<FileId, _> = serde_json::from_str("0");
        assert!(result.is_err());

        let ok: FileId = serde_json::from_str("-7").unwrap();
        assert_eq!(ok.raw(), -7);
    }

    #[test]
    fn draft_ids_strictly_decreasing() {
        let drafts = DraftIds::new();
        let first = drafts.allocate();
        let second = drafts.allocate();
        assert_eq!(first.raw(), -1);
        assert_eq!(second.raw(), -2);
        assert!(first.is_virtual() && second.is_virtual());
    }
}
