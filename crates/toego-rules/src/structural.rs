//! Structural-edit detectors: paragraph shape, dialogue balance, scene scope.

use toego_domain::{DocumentSnapshot, Mark, MarkAuthor, MarkCategory, MarkType, Span};

use crate::analyzer::{AnalysisContext, DetectorFn, DetectorOutput, RuleError, RULE_MATCH_CAP};
use crate::text::{char_len, is_dialogue_paragraph, is_quoted, paragraph_spans, sentence_spans, span_text};

pub(crate) const DETECTORS: &[(&str, DetectorFn)] = &[
    ("structural.overlong_paragraph", overlong_paragraphs),
    ("structural.short_paragraph_run", short_paragraph_runs),
    ("structural.dialogue_ratio", dialogue_ratio),
    ("structural.missing_participant", missing_participants),
    ("structural.short_document", short_document),
];

/// Absolute floor for the over-long paragraph test; the 3x-mean ratio alone
/// would flood short documents with false positives.
const OVERLONG_PARAGRAPH_FLOOR: usize = 500;

const SHORT_PARAGRAPH_CHARS: usize = 100;
const SHORT_RUN_MIN: usize = 3;

const DIALOGUE_RATIO_LOW: f64 = 0.1;
const DIALOGUE_RATIO_HIGH: f64 = 0.7;

const SHORT_DOCUMENT_CHARS: usize = 500;

fn overlong_paragraphs(
    doc: &DocumentSnapshot,
    _ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    let paragraphs = paragraph_spans(&doc.text);
    if paragraphs.is_empty() {
        return Ok(out);
    }

    let lengths: Vec<usize> = paragraphs
        .iter()
        .map(|s| char_len(span_text(&doc.text, *s)))
        .collect();
    let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

    for (span, len) in paragraphs.iter().zip(&lengths) {
        if out.marks.len() >= RULE_MATCH_CAP {
            break;
        }
        if (*len as f64) > mean * 3.0 && *len > OVERLONG_PARAGRAPH_FLOOR {
            out.marks.push(
                Mark::new(doc, *span, MarkType::Suggestion, MarkCategory::Pacing, MarkAuthor::Ai)?
                    .with_comment(format!(
                        "Paragraph runs {} characters, over three times the scene mean; consider splitting it.",
                        len
                    )),
            );
        }
    }
    Ok(out)
}

fn short_paragraph_runs(
    doc: &DocumentSnapshot,
    _ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    let mut run: Vec<Span> = Vec::new();
    for span in paragraph_spans(&doc.text) {
        if char_len(span_text(&doc.text, span)) < SHORT_PARAGRAPH_CHARS {
            run.push(span);
            continue;
        }
        flush_short_run(doc, &run, &mut out)?;
        run.clear();
    }
    flush_short_run(doc, &run, &mut out)?;
    Ok(out)
}

fn flush_short_run(
    doc: &DocumentSnapshot,
    run: &[Span],
    out: &mut DetectorOutput,
) -> Result<(), RuleError> {
    if run.len() < SHORT_RUN_MIN || out.marks.len() >= RULE_MATCH_CAP {
        return Ok(());
    }
    // A stretch of short dialogue lines is normal rhythm, not fragmentation
    if run
        .iter()
        .all(|s| is_dialogue_paragraph(span_text(&doc.text, *s)))
    {
        return Ok(());
    }
    let covering = Span::new(run[0].start, run[run.len() - 1].end);
    out.marks.push(
        Mark::new(doc, covering, MarkType::Suggestion, MarkCategory::Pacing, MarkAuthor::Ai)?
            .with_comment(format!(
                "{} consecutive paragraphs under {} characters; narration may be too fragmented.",
                run.len(),
                SHORT_PARAGRAPH_CHARS
            )),
    );
    Ok(())
}

fn dialogue_ratio(
    doc: &DocumentSnapshot,
    _ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    let sentences = sentence_spans(&doc.text);
    if sentences.is_empty() {
        return Ok(out);
    }

    let quoted = sentences
        .iter()
        .filter(|s| is_quoted(span_text(&doc.text, **s)))
        .count();
    let ratio = quoted as f64 / sentences.len() as f64;

    if ratio < DIALOGUE_RATIO_LOW || ratio > DIALOGUE_RATIO_HIGH {
        let verdict = if ratio < DIALOGUE_RATIO_LOW {
            "little"
        } else {
            "much"
        };
        out.marks.push(
            Mark::new(
                doc,
                Span::empty(0),
                MarkType::Comment,
                MarkCategory::Dialogue,
                MarkAuthor::Ai,
            )?
            .with_comment(format!(
                "Quoted dialogue makes up {:.0}% of {} sentences; too {} for the scene.",
                ratio * 100.0,
                sentences.len(),
                verdict
            )),
        );
    }
    Ok(out)
}

fn missing_participants(
    doc: &DocumentSnapshot,
    ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    for name in &ctx.participants {
        if out.marks.len() >= RULE_MATCH_CAP {
            break;
        }
        let name = name.trim();
        if name.is_empty() || doc.text.contains(name) {
            continue;
        }
        out.marks.push(
            Mark::new(
                doc,
                Span::empty(0),
                MarkType::Comment,
                MarkCategory::Character,
                MarkAuthor::Ai,
            )?
            .with_comment(format!("Participant '{}' never appears in this scene.", name)),
        );
    }
    Ok(out)
}

fn short_document(
    doc: &DocumentSnapshot,
    _ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    let chars = doc.char_count();
    if chars < SHORT_DOCUMENT_CHARS {
        out.marks.push(
            Mark::new(
                doc,
                Span::empty(0),
                MarkType::Comment,
                MarkCategory::Plot,
                MarkAuthor::Ai,
            )?
            .with_comment(format!(
                "Scene is only {} characters; likely underdeveloped.",
                chars
            )),
        );
    }
    Ok(out)
}
