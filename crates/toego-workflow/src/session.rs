//! The seven-phase session state machine.

use chrono::Utc;
use thiserror::Error;
use toego_domain::{EditPhase, EditSession, MarkStatus, PhaseRecord, SessionStatus};

/// Errors from phase transitions. One named variant per cause; the state
/// machine never silently skips marks or repairs its log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The phase being left still has pending marks
    #[error("{pending} pending marks remain in phase {phase:?}")]
    PendingMarks { phase: EditPhase, pending: usize },

    /// The session's phase log has no open record for the current phase
    #[error("no active record for phase {phase:?}")]
    MissingActiveRecord { phase: EditPhase },
}

/// Outcome of a successful [`advance_phase`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseAdvance {
    Advanced(EditPhase),
    /// The session was already at final approval; advancing is a no-op
    AlreadyComplete,
}

/// Open a session for a document, starting at the AI draft phase.
pub fn create_session(
    project_id: impl Into<String>,
    document_ref: impl Into<String>,
) -> EditSession {
    let phase = EditPhase::AiDraft;
    EditSession {
        id: uuid::Uuid::new_v4().to_string(),
        project_id: project_id.into(),
        document_ref: document_ref.into(),
        status: SessionStatus::InProgress,
        current_phase: phase,
        phases: vec![PhaseRecord::open(phase)],
        total_marks: 0,
        resolved_marks: 0,
        accepted_marks: 0,
        rejected_marks: 0,
    }
}

/// Move `session` to the next phase.
///
/// The caller states how many marks of the current phase are still pending;
/// a nonzero count rejects the call. At final approval the call is an
/// idempotent no-op that normalizes the status to approved.
pub fn advance_phase(
    session: &mut EditSession,
    pending_marks: usize,
) -> Result<PhaseAdvance, WorkflowError> {
    if session.current_phase.is_terminal() {
        session.status = SessionStatus::Approved;
        return Ok(PhaseAdvance::AlreadyComplete);
    }
    if pending_marks > 0 {
        return Err(WorkflowError::PendingMarks {
            phase: session.current_phase,
            pending: pending_marks,
        });
    }
    let Some(next) = session.current_phase.next() else {
        return Ok(PhaseAdvance::AlreadyComplete);
    };

    let phase = session.current_phase;
    let record = session
        .active_record_mut()
        .ok_or(WorkflowError::MissingActiveRecord { phase })?;
    record.completed_at = Some(Utc::now());

    session.phases.push(PhaseRecord::open(next));
    session.current_phase = next;
    session.status = match next {
        EditPhase::HumanReview => SessionStatus::Review,
        EditPhase::FinalApproval => SessionStatus::Approved,
        _ => session.status,
    };
    tracing::debug!(session = %session.id, phase = next.as_str(), "phase advanced");
    Ok(PhaseAdvance::Advanced(next))
}

/// Record `count` newly created marks against the active phase.
pub fn register_created(session: &mut EditSession, count: u32) -> Result<(), WorkflowError> {
    let phase = session.current_phase;
    let record = session
        .active_record_mut()
        .ok_or(WorkflowError::MissingActiveRecord { phase })?;
    record.marks_created += count;
    session.total_marks += count;
    Ok(())
}

/// Record one mark resolution against the active phase. Modified counts as
/// accepted: the reviewer authorized a change. A pending status records
/// nothing.
pub fn register_resolved(
    session: &mut EditSession,
    status: MarkStatus,
) -> Result<(), WorkflowError> {
    if !status.is_resolved() {
        return Ok(());
    }
    let phase = session.current_phase;
    let record = session
        .active_record_mut()
        .ok_or(WorkflowError::MissingActiveRecord { phase })?;
    record.marks_resolved += 1;
    session.resolved_marks += 1;
    match status {
        MarkStatus::Accepted | MarkStatus::Modified => session.accepted_marks += 1,
        MarkStatus::Rejected => session.rejected_marks += 1,
        MarkStatus::Pending => {}
    }
    Ok(())
}
