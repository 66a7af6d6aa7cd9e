//! Span-anchored editorial annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{DocumentSnapshot, Span};
use crate::error::{DomainError, DomainResult};

/// What kind of edit a mark proposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkType {
    Correction,
    Suggestion,
    Comment,
    Deletion,
    Insertion,
    Rewrite,
}

/// Resolution state of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkStatus {
    Pending,
    Accepted,
    Rejected,
    Modified,
}

impl MarkStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, MarkStatus::Pending)
    }

    /// Whether a mark in this state is authorized for application.
    /// Modified marks carry reviewer-supplied replacement text.
    pub fn is_applicable(&self) -> bool {
        matches!(self, MarkStatus::Accepted | MarkStatus::Modified)
    }
}

/// Who created a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkAuthor {
    Ai,
    Human,
}

/// Editorial category of a finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkCategory {
    Spelling,
    Grammar,
    Style,
    Consistency,
    TranslationStyle,
    Cliche,
    Pacing,
    Dialogue,
    Description,
    Plot,
    Character,
    Other,
}

impl MarkCategory {
    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            MarkCategory::Spelling => "Spelling",
            MarkCategory::Grammar => "Grammar",
            MarkCategory::Style => "Style",
            MarkCategory::Consistency => "Consistency",
            MarkCategory::TranslationStyle => "Translation style",
            MarkCategory::Cliche => "Cliche",
            MarkCategory::Pacing => "Pacing",
            MarkCategory::Dialogue => "Dialogue",
            MarkCategory::Description => "Description",
            MarkCategory::Plot => "Plot",
            MarkCategory::Character => "Character",
            MarkCategory::Other => "Other",
        }
    }
}

/// A reviewer's verdict on a single mark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum Resolution {
    Accept,
    Reject,
    Modify { new_text: String },
}

/// An annotation over a span of a document snapshot.
///
/// Marks are created against a specific snapshot, resolved exactly once, and
/// never deleted; the accumulated set forms the audit trail of an edit
/// session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub id: String,
    pub document_ref: String,
    pub mark_type: MarkType,
    pub status: MarkStatus,
    pub author: MarkAuthor,
    pub category: MarkCategory,
    pub span: Span,
    /// The spanned text as it read at creation time
    pub original_text: String,
    pub suggested_text: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
}

impl Mark {
    /// Create a pending mark over `span` of `snapshot`.
    ///
    /// The span is validated against the snapshot and `original_text` is
    /// taken from it, so the slice-equality invariant holds by construction.
    /// Spans are never clamped; an invalid span is an error.
    pub fn new(
        snapshot: &DocumentSnapshot,
        span: Span,
        mark_type: MarkType,
        category: MarkCategory,
        author: MarkAuthor,
    ) -> DomainResult<Self> {
        let original_text = snapshot.slice_checked(span)?.to_string();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            document_ref: snapshot.document_ref.clone(),
            mark_type,
            status: MarkStatus::Pending,
            author,
            category,
            span,
            original_text,
            suggested_text: None,
            comment: None,
            created_at: Utc::now(),
            resolved_at: None,
            resolved_by: None,
        })
    }

    /// Builder method to attach replacement text.
    pub fn with_suggestion(mut self, text: impl Into<String>) -> Self {
        self.suggested_text = Some(text.into());
        self
    }

    /// Builder method to attach a rationale.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Apply a reviewer verdict.
    ///
    /// A mark resolves exactly once; `resolved_at`/`resolved_by` are written
    /// here and never again. A second call is an error, which is the compare
    /// half of the compare-and-set the single-writer discipline requires.
    pub fn resolve(
        &mut self,
        resolution: Resolution,
        resolved_by: impl Into<String>,
    ) -> DomainResult<()> {
        if self.status.is_resolved() {
            return Err(DomainError::AlreadyResolved {
                id: self.id.clone(),
            });
        }
        match resolution {
            Resolution::Accept => self.status = MarkStatus::Accepted,
            Resolution::Reject => self.status = MarkStatus::Rejected,
            Resolution::Modify { new_text } => {
                self.suggested_text = Some(new_text);
                self.status = MarkStatus::Modified;
            }
        }
        self.resolved_at = Some(Utc::now());
        self.resolved_by = Some(resolved_by.into());
        Ok(())
    }

    /// Re-check span validity and the text snapshot against a possibly
    /// drifted document.
    pub fn verify_against(&self, snapshot: &DocumentSnapshot) -> DomainResult<()> {
        let current = snapshot.slice_checked(self.span)?;
        if current != self.original_text {
            return Err(DomainError::TextMismatch {
                expected: self.original_text.clone(),
                found: current.to_string(),
            });
        }
        Ok(())
    }
}
