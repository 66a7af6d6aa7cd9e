//! The phase-dispatched analyzer harness.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use toego_domain::{DocumentSnapshot, DomainError, EditPhase, Mark, MarkAuthor, MarkCategory, MarkType, Span};

use crate::config::{PatternRule, RuleConfig};
use crate::{copyedit, line, proofread, structural};

/// Hard cap on matches per rule. Bounds every scan, including on
/// pathological input.
pub const RULE_MATCH_CAP: usize = 200;

/// External facts for an analysis pass: who appears in the story, and the
/// active rule tables.
#[derive(Clone, Debug, Default)]
pub struct AnalysisContext {
    pub participants: Vec<String>,
    pub config: RuleConfig,
}

/// A rule that failed and was skipped. Reported in the result rather than
/// swallowed; the rest of the pass is unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSkip {
    pub rule: String,
    pub reason: String,
}

/// Output of one analysis pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub phase: EditPhase,
    pub marks: Vec<Mark>,
    pub skipped: Vec<RuleSkip>,
}

impl AnalysisReport {
    fn empty(phase: EditPhase) -> Self {
        Self {
            phase,
            marks: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Failure of a single rule. Rules are isolated: a failing rule becomes a
/// [`RuleSkip`] and never aborts the pass.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid pattern {pattern:?}: {message}")]
    BadPattern { pattern: String, message: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// What one detector produced: its marks, plus any config entries it had to
/// skip.
#[derive(Debug, Default)]
pub(crate) struct DetectorOutput {
    pub marks: Vec<Mark>,
    pub skipped: Vec<RuleSkip>,
}

pub(crate) type DetectorFn =
    fn(&DocumentSnapshot, &AnalysisContext) -> Result<DetectorOutput, RuleError>;

/// Analyze `snapshot` for `phase`.
///
/// Pure with respect to its inputs; detectors of the phase's family run in
/// parallel and their results are concatenated in fixed detector order, so
/// the report is deterministic up to mark ids and timestamps. Phases without
/// an automated detector family (AI draft, human review, final approval)
/// produce an empty report.
pub fn analyze(
    snapshot: &DocumentSnapshot,
    phase: EditPhase,
    ctx: &AnalysisContext,
) -> AnalysisReport {
    let detectors: &[(&str, DetectorFn)] = match phase {
        EditPhase::StructuralEdit => structural::DETECTORS,
        EditPhase::LineEdit => line::DETECTORS,
        EditPhase::CopyEdit => copyedit::DETECTORS,
        EditPhase::Proofread => proofread::DETECTORS,
        EditPhase::AiDraft | EditPhase::HumanReview | EditPhase::FinalApproval => &[],
    };

    let results: Vec<(&str, Result<DetectorOutput, RuleError>)> = detectors
        .par_iter()
        .map(|(name, detector)| (*name, detector(snapshot, ctx)))
        .collect();

    let mut report = AnalysisReport::empty(phase);
    for (name, result) in results {
        match result {
            Ok(output) => {
                for skip in &output.skipped {
                    tracing::warn!(rule = %skip.rule, reason = %skip.reason, "rule entry skipped");
                }
                report.marks.extend(output.marks);
                report.skipped.extend(output.skipped);
            }
            Err(err) => {
                tracing::warn!(rule = name, error = %err, "rule skipped");
                report.skipped.push(RuleSkip {
                    rule: name.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
    report
}

/// Match every rule of a literal pattern table, one mark per occurrence.
/// Entries with an empty pattern are recorded as skips (an empty literal
/// matches everywhere and would flood the report).
pub(crate) fn run_pattern_table(
    snapshot: &DocumentSnapshot,
    rules: &[PatternRule],
    table: &str,
    mark_type: MarkType,
    category: MarkCategory,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    for rule in rules {
        if rule.pattern.is_empty() {
            out.skipped.push(RuleSkip {
                rule: table.to_string(),
                reason: "empty pattern".to_string(),
            });
            continue;
        }
        for (pos, matched) in snapshot
            .text
            .match_indices(rule.pattern.as_str())
            .take(RULE_MATCH_CAP)
        {
            let span = Span::new(pos, pos + matched.len());
            let mut mark = Mark::new(snapshot, span, mark_type, category, MarkAuthor::Ai)?
                .with_comment(rule.note.clone());
            if let Some(suggestion) = &rule.suggestion {
                mark = mark.with_suggestion(suggestion.clone());
            }
            out.marks.push(mark);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toego_domain::MarkStatus;

    fn doc(text: &str) -> DocumentSnapshot {
        DocumentSnapshot::new("scene-1", text)
    }

    #[test]
    fn non_analysis_phases_are_empty() {
        let snapshot = doc("아주 짧은 장면.");
        let ctx = AnalysisContext::default();
        for phase in [
            EditPhase::AiDraft,
            EditPhase::HumanReview,
            EditPhase::FinalApproval,
        ] {
            let report = analyze(&snapshot, phase, &ctx);
            assert!(report.marks.is_empty());
            assert!(report.skipped.is_empty());
        }
    }

    #[test]
    fn produced_marks_satisfy_span_invariants() {
        let snapshot = doc("그는 마치 화살처럼 빨랐다. 그는 다시 마치 바람처럼 달렸다. 그는 마치 그림자 같았다.");
        let ctx = AnalysisContext {
            participants: vec!["민준".to_string()],
            config: RuleConfig {
                cliches: vec![PatternRule::new("마치", "overused simile opener")],
                ..Default::default()
            },
        };
        for phase in EditPhase::ORDER {
            let report = analyze(&snapshot, phase, &ctx);
            for mark in &report.marks {
                assert!(mark.span.start <= mark.span.end);
                assert!(mark.span.end <= snapshot.len_bytes());
                assert_eq!(
                    snapshot.slice(mark.span).unwrap(),
                    mark.original_text,
                    "slice-equality invariant"
                );
                assert_eq!(mark.status, MarkStatus::Pending);
            }
        }
    }

    #[test]
    fn empty_pattern_is_skipped_not_fatal() {
        let snapshot = doc("비가 왔다. 비가 왔다. 비가 왔다.");
        let ctx = AnalysisContext {
            participants: Vec::new(),
            config: RuleConfig {
                cliches: vec![
                    PatternRule::new("", "broken entry"),
                    PatternRule::new("비가", "weather cliche"),
                ],
                ..Default::default()
            },
        };
        let report = analyze(&snapshot, EditPhase::LineEdit, &ctx);
        // The broken entry is visible in the report
        assert!(report.skipped.iter().any(|s| s.rule == "line.cliche"));
        // The healthy entry still matched
        assert!(report
            .marks
            .iter()
            .any(|m| m.original_text == "비가" && m.category == MarkCategory::Cliche));
    }

    #[test]
    fn match_cap_bounds_pathological_input() {
        let text = "가 ".repeat(10_000);
        let snapshot = doc(&text);
        let ctx = AnalysisContext {
            participants: Vec::new(),
            config: RuleConfig {
                cliches: vec![PatternRule::new("가", "flood")],
                ..Default::default()
            },
        };
        let report = analyze(&snapshot, EditPhase::LineEdit, &ctx);
        let cliche_marks = report
            .marks
            .iter()
            .filter(|m| m.category == MarkCategory::Cliche)
            .count();
        assert!(cliche_marks <= RULE_MATCH_CAP);
    }
}
