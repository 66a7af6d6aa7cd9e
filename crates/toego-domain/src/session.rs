//! Editing sessions and the fixed seven-phase pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stage of the editorial pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPhase {
    AiDraft,
    StructuralEdit,
    LineEdit,
    CopyEdit,
    Proofread,
    HumanReview,
    FinalApproval,
}

impl EditPhase {
    /// All phases in pipeline order.
    pub const ORDER: [EditPhase; 7] = [
        EditPhase::AiDraft,
        EditPhase::StructuralEdit,
        EditPhase::LineEdit,
        EditPhase::CopyEdit,
        EditPhase::Proofread,
        EditPhase::HumanReview,
        EditPhase::FinalApproval,
    ];

    /// Zero-based position in the pipeline.
    pub fn index(&self) -> usize {
        match self {
            EditPhase::AiDraft => 0,
            EditPhase::StructuralEdit => 1,
            EditPhase::LineEdit => 2,
            EditPhase::CopyEdit => 3,
            EditPhase::Proofread => 4,
            EditPhase::HumanReview => 5,
            EditPhase::FinalApproval => 6,
        }
    }

    /// The phase after this one, if any.
    pub fn next(&self) -> Option<EditPhase> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EditPhase::FinalApproval)
    }

    /// Who works this phase: the last two belong to a human reviewer.
    pub fn editor_type(&self) -> EditorType {
        match self {
            EditPhase::HumanReview | EditPhase::FinalApproval => EditorType::Human,
            _ => EditorType::Ai,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditPhase::AiDraft => "ai_draft",
            EditPhase::StructuralEdit => "structural_edit",
            EditPhase::LineEdit => "line_edit",
            EditPhase::CopyEdit => "copy_edit",
            EditPhase::Proofread => "proofread",
            EditPhase::HumanReview => "human_review",
            EditPhase::FinalApproval => "final_approval",
        }
    }

    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            EditPhase::AiDraft => "AI draft",
            EditPhase::StructuralEdit => "Structural edit",
            EditPhase::LineEdit => "Line edit",
            EditPhase::CopyEdit => "Copy edit",
            EditPhase::Proofread => "Proofreading",
            EditPhase::HumanReview => "Human review",
            EditPhase::FinalApproval => "Final approval",
        }
    }
}

/// Who performs edits in a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorType {
    Ai,
    Human,
}

/// Lifecycle state of an edit session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Review,
    Approved,
}

/// Bookkeeping for one phase of one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: EditPhase,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub editor_type: EditorType,
    pub marks_created: u32,
    pub marks_resolved: u32,
}

impl PhaseRecord {
    /// Open a record for `phase` starting now.
    pub fn open(phase: EditPhase) -> Self {
        Self {
            phase,
            started_at: Utc::now(),
            completed_at: None,
            editor_type: phase.editor_type(),
            marks_created: 0,
            marks_resolved: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// One editing session per document under edit.
///
/// `phases` is always a strictly increasing prefix of [`EditPhase::ORDER`],
/// with at most one open record (the active phase). Only the workflow state
/// machine mutates a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    pub id: String,
    pub project_id: String,
    pub document_ref: String,
    pub status: SessionStatus,
    pub current_phase: EditPhase,
    pub phases: Vec<PhaseRecord>,
    pub total_marks: u32,
    pub resolved_marks: u32,
    pub accepted_marks: u32,
    pub rejected_marks: u32,
}

impl EditSession {
    /// The record for the phase currently being worked, if the log is intact.
    pub fn active_record(&self) -> Option<&PhaseRecord> {
        self.phases.last().filter(|r| r.phase == self.current_phase)
    }

    pub fn active_record_mut(&mut self) -> Option<&mut PhaseRecord> {
        let current = self.current_phase;
        self.phases.last_mut().filter(|r| r.phase == current)
    }

    /// Completed phase records, in pipeline order.
    pub fn completed_records(&self) -> impl Iterator<Item = &PhaseRecord> {
        self.phases.iter().filter(|r| r.is_completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_is_fixed() {
        for (i, phase) in EditPhase::ORDER.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
        assert_eq!(EditPhase::AiDraft.next(), Some(EditPhase::StructuralEdit));
        assert_eq!(EditPhase::HumanReview.next(), Some(EditPhase::FinalApproval));
        assert_eq!(EditPhase::FinalApproval.next(), None);
        assert!(EditPhase::FinalApproval.is_terminal());
    }

    #[test]
    fn editor_type_per_phase() {
        assert_eq!(EditPhase::AiDraft.editor_type(), EditorType::Ai);
        assert_eq!(EditPhase::Proofread.editor_type(), EditorType::Ai);
        assert_eq!(EditPhase::HumanReview.editor_type(), EditorType::Human);
        assert_eq!(EditPhase::FinalApproval.editor_type(), EditorType::Human);
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&EditPhase::StructuralEdit).unwrap();
        assert_eq!(json, "\"structural_edit\"");
        let back: EditPhase = serde_json::from_str("\"final_approval\"").unwrap();
        assert_eq!(back, EditPhase::FinalApproval);
    }

    #[test]
    fn open_record_matches_phase() {
        let record = PhaseRecord::open(EditPhase::HumanReview);
        assert_eq!(record.editor_type, EditorType::Human);
        assert!(!record.is_completed());
        assert_eq!(record.marks_created, 0);
    }
}
