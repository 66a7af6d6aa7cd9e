//! Document snapshots and the spans that anchor marks to them.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A half-open `[start, end)` byte interval into a document snapshot.
///
/// Offsets are UTF-8 byte offsets and must land on character boundaries.
/// Bytes are the single span unit across the engine; character counts appear
/// only in thresholds and statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span anchored at `at`, used for document-level findings.
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether two spans share at least one byte.
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check this span against a snapshot. Offsets are never clamped; any
    /// violation fails fast.
    pub fn validate(&self, snapshot: &DocumentSnapshot) -> DomainResult<()> {
        snapshot.slice_checked(*self).map(|_| ())
    }
}

/// An immutable snapshot of manuscript text at a point in time.
///
/// Not a stored entity: just the text a mark or an analysis pass was computed
/// against, plus the external id (scene, chapter) it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// External id of the scene or chapter this text came from
    pub document_ref: String,
    pub text: String,
}

impl DocumentSnapshot {
    pub fn new(document_ref: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document_ref: document_ref.into(),
            text: text.into(),
        }
    }

    /// Length in bytes (the span unit).
    pub fn len_bytes(&self) -> usize {
        self.text.len()
    }

    /// Number of characters, whitespace included.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// The text under `span`, if the span is valid for this snapshot.
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.start..span.end)
    }

    /// The text under `span`, failing fast when the span is out of order,
    /// out of bounds, or off a character boundary.
    pub fn slice_checked(&self, span: Span) -> DomainResult<&str> {
        self.slice(span).ok_or(DomainError::InvalidSpan {
            start: span.start,
            end: span.end,
            len: self.text.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_intersection() {
        let a = Span::new(5, 10);
        assert!(a.intersects(&Span::new(9, 12)));
        assert!(a.intersects(&Span::new(0, 6)));
        assert!(a.intersects(&Span::new(6, 8)));
        // Adjacent half-open spans do not intersect
        assert!(!a.intersects(&Span::new(10, 15)));
        assert!(!a.intersects(&Span::new(0, 5)));
        // Empty spans never intersect anything
        assert!(!a.intersects(&Span::empty(7)));
    }

    #[test]
    fn slice_ascii() {
        let doc = DocumentSnapshot::new("scene-1", "hello world");
        assert_eq!(doc.slice(Span::new(0, 5)), Some("hello"));
        assert_eq!(doc.slice(Span::new(6, 11)), Some("world"));
    }

    #[test]
    fn slice_korean_respects_boundaries() {
        // Hangul syllables are 3 bytes each in UTF-8
        let doc = DocumentSnapshot::new("scene-1", "그녀는 웃었다");
        assert_eq!(doc.slice(Span::new(0, 9)), Some("그녀는"));
        // Offset 1 falls inside the first syllable
        assert!(doc.slice(Span::new(1, 9)).is_none());
        assert!(doc.slice_checked(Span::new(1, 9)).is_err());
    }

    #[test]
    fn validate_rejects_out_of_order_and_out_of_bounds() {
        let doc = DocumentSnapshot::new("scene-1", "short");
        assert!(Span::new(3, 2).validate(&doc).is_err());
        assert!(Span::new(0, 6).validate(&doc).is_err());
        assert!(Span::new(0, 5).validate(&doc).is_ok());
        assert!(Span::empty(5).validate(&doc).is_ok());
    }
}
