//! Copy-edit detectors: direct substitutions and grammar patterns.

use toego_domain::{DocumentSnapshot, Mark, MarkAuthor, MarkCategory, MarkType, Span};

use crate::analyzer::{
    run_pattern_table, AnalysisContext, DetectorFn, DetectorOutput, RuleError, RuleSkip,
    RULE_MATCH_CAP,
};

pub(crate) const DETECTORS: &[(&str, DetectorFn)] = &[
    ("copyedit.correction", corrections),
    ("copyedit.grammar", grammar_patterns),
];

/// Orthography, punctuation duplication, and loanword standardization from
/// the injected correction table. A mark is only emitted when the matched
/// text actually differs from its correction.
fn corrections(doc: &DocumentSnapshot, ctx: &AnalysisContext) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    for correction in &ctx.config.corrections {
        if correction.find.is_empty() {
            out.skipped.push(RuleSkip {
                rule: "copyedit.correction".to_string(),
                reason: "empty find pattern".to_string(),
            });
            continue;
        }
        if correction.find == correction.replace {
            continue;
        }
        for (pos, matched) in doc
            .text
            .match_indices(correction.find.as_str())
            .take(RULE_MATCH_CAP)
        {
            let span = Span::new(pos, pos + matched.len());
            let mut mark = Mark::new(
                doc,
                span,
                MarkType::Correction,
                correction.category,
                MarkAuthor::Ai,
            )?
            .with_suggestion(correction.replace.clone());
            if let Some(note) = &correction.note {
                mark = mark.with_comment(note.clone());
            }
            out.marks.push(mark);
        }
    }
    Ok(out)
}

/// Double passive and double causative constructions from the grammar table.
fn grammar_patterns(
    doc: &DocumentSnapshot,
    ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    run_pattern_table(
        doc,
        &ctx.config.grammar_patterns,
        "copyedit.grammar",
        MarkType::Suggestion,
        MarkCategory::Grammar,
    )
}
