//! Splicing accepted suggestions back into the manuscript.

use thiserror::Error;
use toego_domain::{DocumentSnapshot, DomainError, Mark, Span};

/// Errors that refuse an application batch. The batch is checked in full
/// before any splice, so a refused batch leaves no partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// Two applicable marks cover conflicting spans
    #[error("marks {first} and {second} cover conflicting spans")]
    OverlapConflict { first: String, second: String },

    /// A mark's text snapshot no longer matches the live document
    #[error("mark {mark_id} was taken against text that has since changed")]
    StaleOriginalText { mark_id: String },

    /// A mark's span does not fit the live document
    #[error("mark {mark_id} has invalid span [{start}, {end}) for document of {len} bytes")]
    InvalidSpan {
        mark_id: String,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Result of a successful application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedDocument {
    pub snapshot: DocumentSnapshot,
    /// Ids of the applied marks, in application (right-to-left) order
    pub applied: Vec<String>,
}

/// Splice every applicable mark of `marks` into `snapshot`.
///
/// Applicable means resolved to accepted or modified, with replacement text.
/// Marks are applied in descending start-offset order: working right to
/// left, nothing left of an unapplied mark has been touched when its turn
/// comes, so the offsets it recorded against the original text stay valid
/// throughout. For any set of pairwise non-conflicting marks the result is
/// therefore independent of the input order.
pub fn apply_accepted(
    snapshot: &DocumentSnapshot,
    marks: &[Mark],
) -> Result<AppliedDocument, ApplyError> {
    let mut applicable: Vec<&Mark> = marks
        .iter()
        .filter(|m| m.status.is_applicable() && m.suggested_text.is_some())
        .collect();
    applicable.sort_by(|a, b| b.span.start.cmp(&a.span.start));

    // Conflicts are detected up front and refuse the whole batch; one mark
    // is never applied while its neighbor is silently dropped.
    for (i, earlier) in applicable.iter().enumerate() {
        for later in &applicable[i + 1..] {
            if conflicts(&earlier.span, &later.span) {
                return Err(ApplyError::OverlapConflict {
                    first: later.id.clone(),
                    second: earlier.id.clone(),
                });
            }
        }
    }

    for mark in &applicable {
        if let Err(err) = mark.verify_against(snapshot) {
            return Err(match err {
                DomainError::InvalidSpan { start, end, len } => ApplyError::InvalidSpan {
                    mark_id: mark.id.clone(),
                    start,
                    end,
                    len,
                },
                _ => ApplyError::StaleOriginalText {
                    mark_id: mark.id.clone(),
                },
            });
        }
    }

    let mut text = snapshot.text.clone();
    let mut applied = Vec::with_capacity(applicable.len());
    for mark in &applicable {
        let replacement = mark.suggested_text.as_deref().unwrap_or("");
        text.replace_range(mark.span.start..mark.span.end, replacement);
        applied.push(mark.id.clone());
    }

    Ok(AppliedDocument {
        snapshot: DocumentSnapshot::new(snapshot.document_ref.clone(), text),
        applied,
    })
}

/// Span conflict: a genuine intersection, or an insertion point strictly
/// inside a replaced range (the splice would wipe the inserted text).
fn conflicts(a: &Span, b: &Span) -> bool {
    if a.intersects(b) {
        return true;
    }
    (a.is_empty() && b.start < a.start && a.start < b.end)
        || (b.is_empty() && a.start < b.start && b.start < a.end)
}
