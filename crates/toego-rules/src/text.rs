//! Offset-correct text segmentation shared by the detectors.
//!
//! All spans returned here are byte offsets on character boundaries of the
//! input, so they can anchor marks directly.

use toego_domain::Span;

/// Characters that end a sentence.
pub const SENTENCE_TERMINATORS: [char; 5] = ['.', '!', '?', '…', '。'];

/// Quotation characters that signal dialogue.
pub const QUOTE_CHARS: [char; 9] = ['"', '“', '”', '‘', '’', '「', '」', '『', '』'];

/// Quotation characters that can open a dialogue line.
const OPENING_QUOTES: [char; 5] = ['"', '“', '‘', '「', '『'];

/// Quotation characters that close a dialogue line; after terminal
/// punctuation they attach to the sentence they end.
const CLOSING_QUOTES: [char; 5] = ['"', '”', '’', '」', '』'];

/// Character count of a string slice.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The text under `span`. Spans produced by this module are always
/// boundary-correct; anything else yields the empty string.
pub fn span_text<'a>(text: &'a str, span: Span) -> &'a str {
    text.get(span.start..span.end).unwrap_or("")
}

/// Byte spans of paragraphs, split on blank-line boundaries.
///
/// A paragraph is a maximal run of non-blank lines; whitespace-only lines
/// separate paragraphs. Trailing line breaks are excluded from each span.
pub fn paragraph_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut para_start: Option<usize> = None;
    let mut para_end = 0usize;
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(|c| c == '\n' || c == '\r');
        if content.trim().is_empty() {
            if let Some(start) = para_start.take() {
                spans.push(Span::new(start, para_end));
            }
        } else {
            if para_start.is_none() {
                para_start = Some(offset);
            }
            para_end = offset + content.len();
        }
        offset += line.len();
    }
    if let Some(start) = para_start {
        spans.push(Span::new(start, para_end));
    }
    spans
}

/// Byte spans of sentences, split after runs of terminal punctuation.
/// Leading and trailing whitespace is excluded from each span.
pub fn sentence_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut in_terminator = false;

    for (i, c) in text.char_indices() {
        if SENTENCE_TERMINATORS.contains(&c) {
            in_terminator = true;
        } else if in_terminator && CLOSING_QUOTES.contains(&c) {
            // “...다.” — the closing quote belongs to the sentence it ends
        } else if in_terminator {
            push_trimmed(text, start, i, &mut spans);
            start = i;
            in_terminator = false;
        }
    }
    push_trimmed(text, start, text.len(), &mut spans);
    spans
}

fn push_trimmed(text: &str, start: usize, end: usize, spans: &mut Vec<Span>) {
    let slice = &text[start..end];
    let stripped = slice.trim_start();
    let leading = slice.len() - stripped.len();
    let content = stripped.trim_end();
    if !content.is_empty() {
        spans.push(Span::new(start + leading, start + leading + content.len()));
    }
}

/// Whether a string contains any quotation character.
pub fn is_quoted(s: &str) -> bool {
    s.chars().any(|c| QUOTE_CHARS.contains(&c))
}

/// Whether a paragraph reads as a quoted dialogue line.
pub fn is_dialogue_paragraph(s: &str) -> bool {
    s.trim_start()
        .chars()
        .next()
        .map(|c| OPENING_QUOTES.contains(&c))
        .unwrap_or(false)
}

/// A whitespace-delimited token.
#[derive(Clone, Copy, Debug)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
    /// Character offset of the token start, for window arithmetic
    pub char_pos: usize,
}

/// Whitespace-delimited tokens with byte spans and character positions.
pub fn tokens(text: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut start: Option<(usize, usize)> = None;

    for (char_pos, (byte_pos, c)) in text.char_indices().enumerate() {
        if c.is_whitespace() {
            if let Some((b, cp)) = start.take() {
                out.push(Token {
                    text: &text[b..byte_pos],
                    span: Span::new(b, byte_pos),
                    char_pos: cp,
                });
            }
        } else if start.is_none() {
            start = Some((byte_pos, char_pos));
        }
    }
    if let Some((b, cp)) = start {
        out.push(Token {
            text: &text[b..],
            span: Span::new(b, text.len()),
            char_pos: cp,
        });
    }
    out
}
