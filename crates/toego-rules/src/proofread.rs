//! Proofreading detectors: numerals, name spacing, particle repetition.

use lazy_static::lazy_static;
use regex::Regex;
use toego_domain::{DocumentSnapshot, Mark, MarkAuthor, MarkCategory, MarkType, Span};

use crate::analyzer::{AnalysisContext, DetectorFn, DetectorOutput, RuleError, RuleSkip, RULE_MATCH_CAP};
use crate::text::{char_len, sentence_spans, span_text};

pub(crate) const DETECTORS: &[(&str, DetectorFn)] = &[
    ("proofread.small_number", small_numbers),
    ("proofread.spaced_name", spaced_names),
    ("proofread.repeated_particle", repeated_particles),
];

/// Numbers up to this value should be spelled out in prose.
const SPELL_OUT_MAX: u32 = 100;

const PARTICLE_SENTENCE_MAX: usize = 200;
const PARTICLE_REPEAT_MIN: usize = 3;

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").expect("digit-run pattern");
}

fn small_numbers(
    doc: &DocumentSnapshot,
    _ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    for m in DIGIT_RUN.find_iter(&doc.text).take(RULE_MATCH_CAP) {
        let Ok(value) = m.as_str().parse::<u32>() else {
            // Longer than u32: certainly not a small number
            continue;
        };
        if value > SPELL_OUT_MAX {
            continue;
        }
        out.marks.push(
            Mark::new(
                doc,
                Span::new(m.start(), m.end()),
                MarkType::Suggestion,
                MarkCategory::Style,
                MarkAuthor::Ai,
            )?
            .with_comment(format!("Write out small numbers in prose ('{}').", m.as_str())),
        );
    }
    Ok(out)
}

/// A known participant name with whitespace slipped between its characters,
/// e.g. `김 철수` for `김철수`.
fn spaced_names(doc: &DocumentSnapshot, ctx: &AnalysisContext) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    for name in &ctx.participants {
        let name = name.trim();
        let chars: Vec<char> = name.chars().collect();
        if chars.len() < 2 {
            continue;
        }
        let pattern = chars
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect::<Vec<_>>()
            .join("[ \\t]*");
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(err) => {
                out.skipped.push(RuleSkip {
                    rule: "proofread.spaced_name".to_string(),
                    reason: format!("pattern for '{}': {}", name, err),
                });
                continue;
            }
        };
        for m in re.find_iter(&doc.text).take(RULE_MATCH_CAP) {
            // The pattern also matches the canonical spelling; only the
            // spaced variants are findings
            if !m.as_str().chars().any(|c| c == ' ' || c == '\t') {
                continue;
            }
            out.marks.push(
                Mark::new(
                    doc,
                    Span::new(m.start(), m.end()),
                    MarkType::Correction,
                    MarkCategory::Consistency,
                    MarkAuthor::Ai,
                )?
                .with_suggestion(name.to_string())
                .with_comment(format!("Spacing variant of the name '{}'.", name)),
            );
        }
    }
    Ok(out)
}

/// The same particle three or more times inside one short sentence.
fn repeated_particles(
    doc: &DocumentSnapshot,
    ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    let mut particles: Vec<&str> = Vec::new();
    for particle in &ctx.config.particles {
        if particle.is_empty() {
            out.skipped.push(RuleSkip {
                rule: "proofread.repeated_particle".to_string(),
                reason: "empty particle".to_string(),
            });
        } else {
            particles.push(particle);
        }
    }
    if particles.is_empty() {
        return Ok(out);
    }

    for span in sentence_spans(&doc.text) {
        if out.marks.len() >= RULE_MATCH_CAP {
            break;
        }
        let sentence = span_text(&doc.text, span);
        if char_len(sentence) >= PARTICLE_SENTENCE_MAX {
            continue;
        }
        for particle in &particles {
            let count = sentence.matches(particle).count();
            if count >= PARTICLE_REPEAT_MIN {
                out.marks.push(
                    Mark::new(doc, span, MarkType::Suggestion, MarkCategory::Style, MarkAuthor::Ai)?
                        .with_comment(format!(
                            "Particle '{}' appears {} times in one sentence.",
                            particle, count
                        )),
                );
            }
        }
    }
    Ok(out)
}
