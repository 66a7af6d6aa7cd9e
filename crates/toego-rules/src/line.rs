//! Line-edit detectors: clichés, translationese, repetition, sentence length.

use std::collections::BTreeMap;

use toego_domain::{DocumentSnapshot, Mark, MarkAuthor, MarkCategory, MarkType, Span};

use crate::analyzer::{
    run_pattern_table, AnalysisContext, DetectorFn, DetectorOutput, RuleError, RULE_MATCH_CAP,
};
use crate::text::{char_len, sentence_spans, span_text, tokens};

pub(crate) const DETECTORS: &[(&str, DetectorFn)] = &[
    ("line.cliche", cliches),
    ("line.translation_style", translation_patterns),
    ("line.repeated_token", repeated_tokens),
    ("line.told_not_shown", told_not_shown),
    ("line.overlong_sentence", overlong_sentences),
];

/// Window for the same-token repetition test.
const TOKEN_WINDOW_CHARS: usize = 1000;
const TOKEN_REPEAT_MIN: usize = 3;

const SENTENCE_CHAR_LIMIT: usize = 150;

fn cliches(doc: &DocumentSnapshot, ctx: &AnalysisContext) -> Result<DetectorOutput, RuleError> {
    run_pattern_table(
        doc,
        &ctx.config.cliches,
        "line.cliche",
        MarkType::Suggestion,
        MarkCategory::Cliche,
    )
}

fn translation_patterns(
    doc: &DocumentSnapshot,
    ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    run_pattern_table(
        doc,
        &ctx.config.translation_patterns,
        "line.translation_style",
        MarkType::Suggestion,
        MarkCategory::TranslationStyle,
    )
}

/// One mark per token that repeats three or more times inside a 1000-char
/// window, anchored at the first token of the first offending window.
fn repeated_tokens(
    doc: &DocumentSnapshot,
    _ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();

    // BTreeMap keeps the scan deterministic
    let mut occurrences: BTreeMap<String, Vec<(Span, usize)>> = BTreeMap::new();
    for token in tokens(&doc.text) {
        if char_len(token.text) < 2 {
            continue;
        }
        occurrences
            .entry(token.text.to_lowercase())
            .or_default()
            .push((token.span, token.char_pos));
    }

    let mut flagged: Vec<(Span, String, usize)> = Vec::new();
    for (token, places) in &occurrences {
        if places.len() < TOKEN_REPEAT_MIN {
            continue;
        }
        for (i, (span, char_pos)) in places.iter().enumerate() {
            if i + TOKEN_REPEAT_MIN > places.len() {
                break;
            }
            let window_end = char_pos + TOKEN_WINDOW_CHARS;
            let in_window = places[i..]
                .iter()
                .take_while(|(_, cp)| *cp < window_end)
                .count();
            if in_window >= TOKEN_REPEAT_MIN {
                flagged.push((*span, token.clone(), in_window));
                break;
            }
        }
    }

    flagged.sort_by_key(|(span, _, _)| span.start);
    for (span, token, count) in flagged.into_iter().take(RULE_MATCH_CAP) {
        out.marks.push(
            Mark::new(doc, span, MarkType::Suggestion, MarkCategory::Style, MarkAuthor::Ai)?
                .with_comment(format!(
                    "'{}' appears {} times within about {} characters.",
                    token, count, TOKEN_WINDOW_CHARS
                )),
        );
    }
    Ok(out)
}

fn told_not_shown(
    doc: &DocumentSnapshot,
    ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    run_pattern_table(
        doc,
        &ctx.config.emotion_words,
        "line.told_not_shown",
        MarkType::Suggestion,
        MarkCategory::Description,
    )
}

fn overlong_sentences(
    doc: &DocumentSnapshot,
    _ctx: &AnalysisContext,
) -> Result<DetectorOutput, RuleError> {
    let mut out = DetectorOutput::default();
    for span in sentence_spans(&doc.text) {
        if out.marks.len() >= RULE_MATCH_CAP {
            break;
        }
        let len = char_len(span_text(&doc.text, span));
        if len > SENTENCE_CHAR_LIMIT {
            out.marks.push(
                Mark::new(doc, span, MarkType::Suggestion, MarkCategory::Style, MarkAuthor::Ai)?
                    .with_comment(format!(
                        "Sentence runs {} characters; consider breaking it up.",
                        len
                    )),
            );
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PatternRule, RuleConfig};

    fn doc(text: &str) -> DocumentSnapshot {
        DocumentSnapshot::new("scene-1", text)
    }

    #[test]
    fn cliche_table_marks_every_occurrence() {
        let snapshot = doc("심장이 덜컥 내려앉았다. 그리고 또 심장이 덜컥 내려앉았다.");
        let ctx = AnalysisContext {
            participants: Vec::new(),
            config: RuleConfig {
                cliches: vec![PatternRule::new("심장이 덜컥 내려앉았다", "stock phrase")
                    .with_suggestion("가슴이 내려앉았다")],
                ..Default::default()
            },
        };
        let marks = cliches(&snapshot, &ctx).unwrap().marks;
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].category, MarkCategory::Cliche);
        assert_eq!(marks[0].original_text, "심장이 덜컥 내려앉았다");
        assert_eq!(marks[0].suggested_text.as_deref(), Some("가슴이 내려앉았다"));
        assert_eq!(marks[0].comment.as_deref(), Some("stock phrase"));
    }

    #[test]
    fn repeated_token_flagged_once_at_first_occurrence() {
        let snapshot = doc("갑자기 문이 열렸다. 갑자기 바람이 불었다. 갑자기 불이 꺼졌다.");
        let ctx = AnalysisContext::default();
        let marks = repeated_tokens(&snapshot, &ctx).unwrap().marks;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].span.start, 0);
        assert_eq!(marks[0].original_text, "갑자기");
        assert!(marks[0].comment.as_deref().unwrap().contains("3 times"));
    }

    #[test]
    fn distant_repetition_is_not_flagged() {
        // Three occurrences spread far beyond the 1000-char window
        let filler = "다른 이야기가 길게 이어졌다 ".repeat(40); // ~600 chars
        let text = format!("갑자기 시작했다. {filler}갑자기 멈췄다. {filler}갑자기 끝났다.");
        let snapshot = doc(&text);
        let ctx = AnalysisContext::default();
        let marks = repeated_tokens(&snapshot, &ctx).unwrap().marks;
        assert!(marks.iter().all(|m| m.original_text != "갑자기"));
    }

    #[test]
    fn overlong_sentence_flagged() {
        let long = format!("{} 끝.", "그리고 또 그리고".repeat(20));
        let snapshot = doc(&long);
        let ctx = AnalysisContext::default();
        let marks = overlong_sentences(&snapshot, &ctx).unwrap().marks;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].category, MarkCategory::Style);
    }

    #[test]
    fn told_not_shown_uses_emotion_table() {
        let snapshot = doc("그는 슬펐다.");
        let ctx = AnalysisContext {
            participants: Vec::new(),
            config: RuleConfig {
                emotion_words: vec![PatternRule::new("슬펐다", "shown, not told: describe the grief")],
                ..Default::default()
            },
        };
        let marks = told_not_shown(&snapshot, &ctx).unwrap().marks;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].category, MarkCategory::Description);
    }
}
