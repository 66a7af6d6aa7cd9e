//! Processing the reviewer's decision stream.

use serde::{Deserialize, Serialize};
use toego_domain::{Mark, MarkStatus, Resolution};

/// One decision from the review surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionDecision {
    pub mark_id: String,
    pub decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_text: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
    Modify,
}

/// Per-decision outcome. One bad decision never aborts the stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ResolutionOutcome {
    Resolved { mark_id: String, status: MarkStatus },
    UnknownMark { mark_id: String },
    AlreadyResolved { mark_id: String },
    /// A modify decision without replacement text
    MissingReplacement { mark_id: String },
}

/// Apply a stream of decisions to a document's marks.
///
/// Takes the marks by exclusive reference: resolution is single-writer per
/// document, and `Mark::resolve` refuses a second resolution, which together
/// give the compare-and-set the mark lifecycle requires.
pub fn apply_decisions(
    marks: &mut [Mark],
    decisions: &[ResolutionDecision],
    resolved_by: &str,
) -> Vec<ResolutionOutcome> {
    decisions
        .iter()
        .map(|decision| apply_decision(marks, decision, resolved_by))
        .collect()
}

fn apply_decision(
    marks: &mut [Mark],
    decision: &ResolutionDecision,
    resolved_by: &str,
) -> ResolutionOutcome {
    let Some(mark) = marks.iter_mut().find(|m| m.id == decision.mark_id) else {
        return ResolutionOutcome::UnknownMark {
            mark_id: decision.mark_id.clone(),
        };
    };
    let resolution = match decision.decision {
        Decision::Accept => Resolution::Accept,
        Decision::Reject => Resolution::Reject,
        Decision::Modify => match &decision.new_text {
            Some(text) => Resolution::Modify {
                new_text: text.clone(),
            },
            None => {
                return ResolutionOutcome::MissingReplacement {
                    mark_id: decision.mark_id.clone(),
                }
            }
        },
    };
    match mark.resolve(resolution, resolved_by) {
        Ok(()) => ResolutionOutcome::Resolved {
            mark_id: mark.id.clone(),
            status: mark.status,
        },
        Err(_) => ResolutionOutcome::AlreadyResolved {
            mark_id: mark.id.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toego_domain::{DocumentSnapshot, MarkAuthor, MarkCategory, MarkType, Span};

    fn pending_mark(doc: &DocumentSnapshot, start: usize, end: usize) -> Mark {
        Mark::new(
            doc,
            Span::new(start, end),
            MarkType::Suggestion,
            MarkCategory::Style,
            MarkAuthor::Ai,
        )
        .unwrap()
        .with_suggestion("replacement")
    }

    fn decision(mark_id: &str, decision: Decision) -> ResolutionDecision {
        ResolutionDecision {
            mark_id: mark_id.to_string(),
            decision,
            new_text: None,
        }
    }

    #[test]
    fn decisions_resolve_their_marks() {
        let doc = DocumentSnapshot::new("scene-1", "some manuscript text");
        let mut marks = vec![pending_mark(&doc, 0, 4), pending_mark(&doc, 5, 15)];
        let decisions = vec![
            decision(&marks[0].id.clone(), Decision::Accept),
            decision(&marks[1].id.clone(), Decision::Reject),
        ];

        let outcomes = apply_decisions(&mut marks, &decisions, "reviewer-1");
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            outcomes[0],
            ResolutionOutcome::Resolved {
                status: MarkStatus::Accepted,
                ..
            }
        ));
        assert_eq!(marks[0].status, MarkStatus::Accepted);
        assert_eq!(marks[1].status, MarkStatus::Rejected);
        assert_eq!(marks[0].resolved_by.as_deref(), Some("reviewer-1"));
    }

    #[test]
    fn unknown_mark_is_reported_and_stream_continues() {
        let doc = DocumentSnapshot::new("scene-1", "some manuscript text");
        let mut marks = vec![pending_mark(&doc, 0, 4)];
        let decisions = vec![
            decision("no-such-mark", Decision::Accept),
            decision(&marks[0].id.clone(), Decision::Accept),
        ];

        let outcomes = apply_decisions(&mut marks, &decisions, "reviewer-1");
        assert!(matches!(outcomes[0], ResolutionOutcome::UnknownMark { .. }));
        assert_eq!(marks[0].status, MarkStatus::Accepted);
    }

    #[test]
    fn double_resolution_is_reported() {
        let doc = DocumentSnapshot::new("scene-1", "some manuscript text");
        let mut marks = vec![pending_mark(&doc, 0, 4)];
        let id = marks[0].id.clone();
        let decisions = vec![decision(&id, Decision::Accept), decision(&id, Decision::Reject)];

        let outcomes = apply_decisions(&mut marks, &decisions, "reviewer-1");
        assert!(matches!(outcomes[1], ResolutionOutcome::AlreadyResolved { .. }));
        assert_eq!(marks[0].status, MarkStatus::Accepted);
    }

    #[test]
    fn modify_requires_replacement_text() {
        let doc = DocumentSnapshot::new("scene-1", "some manuscript text");
        let mut marks = vec![pending_mark(&doc, 0, 4)];
        let id = marks[0].id.clone();

        let outcomes = apply_decisions(&mut marks, &[decision(&id, Decision::Modify)], "reviewer-1");
        assert!(matches!(
            outcomes[0],
            ResolutionOutcome::MissingReplacement { .. }
        ));
        assert_eq!(marks[0].status, MarkStatus::Pending);

        let with_text = ResolutionDecision {
            mark_id: id,
            decision: Decision::Modify,
            new_text: Some("better phrasing".to_string()),
        };
        let outcomes = apply_decisions(&mut marks, &[with_text], "reviewer-1");
        assert!(matches!(
            outcomes[0],
            ResolutionOutcome::Resolved {
                status: MarkStatus::Modified,
                ..
            }
        ));
        assert_eq!(marks[0].suggested_text.as_deref(), Some("better phrasing"));
    }
}
