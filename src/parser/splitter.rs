//! Clause splitter
//!
//! Breaks a query into the spans of its SELECT/FROM head and its optional
//! JOIN, WHERE and GROUP BY clauses. Keywords are recognised only as whole
//! whitespace-delimited words, case-insensitively. Clauses must appear at
//! most once and in the order JOIN, WHERE, GROUP BY.

use super::ast::JoinType;
use super::errors::{ParserError, ParserResult};

/// A whitespace-delimited word with its byte span in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Word<'_> {
    /// Case-insensitive keyword comparison
    pub fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }
}

/// Splits input into words, keeping byte offsets
pub(crate) fn words(input: &str) -> Vec<Word<'_>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, ch) in input.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(Word {
                    text: &input[s..i],
                    start: s,
                    end: i,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start {
        out.push(Word {
            text: &input[s..],
            start: s,
            end: input.len(),
        });
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseKind {
    Join(JoinType),
    Where,
    GroupBy,
}

impl ClauseKind {
    /// Required textual position relative to the other clauses
    fn rank(&self) -> u8 {
        match self {
            ClauseKind::Join(_) => 0,
            ClauseKind::Where => 1,
            ClauseKind::GroupBy => 2,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ClauseKind::Join(_) => "JOIN",
            ClauseKind::Where => "WHERE",
            ClauseKind::GroupBy => "GROUP BY",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    kind: ClauseKind,
    /// Start of the keyword (including the join type word)
    start: usize,
    /// End of the keyword; the clause body begins here
    end: usize,
}

/// Textual spans of one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClauseSpans<'a> {
    /// `SELECT ... FROM ...`
    pub head: &'a str,
    /// Join type and the text after `<TYPE> JOIN`
    pub join: Option<(JoinType, &'a str)>,
    /// Text after `WHERE`
    pub where_clause: Option<&'a str>,
    /// Text after `GROUP BY`
    pub group_by: Option<&'a str>,
}

/// Splits a trimmed query into clause spans
pub(crate) fn split_clauses(query: &str) -> ParserResult<ClauseSpans<'_>> {
    let words = words(query);
    let markers = find_markers(&words)?;

    for pair in markers.windows(2) {
        if pair[0].kind.rank() == pair[1].kind.rank() {
            return Err(ParserError::malformed(format!(
                "Duplicate {} clause",
                pair[1].kind.name()
            )));
        }
        if pair[0].kind.rank() > pair[1].kind.rank() {
            return Err(ParserError::malformed(format!(
                "{} clause must precede {} clause",
                pair[1].kind.name(),
                pair[0].kind.name()
            )));
        }
    }

    let head_end = markers.first().map_or(query.len(), |m| m.start);
    let mut spans = ClauseSpans {
        head: query[..head_end].trim(),
        join: None,
        where_clause: None,
        group_by: None,
    };

    for (i, marker) in markers.iter().enumerate() {
        let body_end = markers.get(i + 1).map_or(query.len(), |next| next.start);
        let body = query[marker.end..body_end].trim();
        if body.is_empty() {
            return Err(ParserError::malformed(format!(
                "Empty {} clause",
                marker.kind.name()
            )));
        }

        match marker.kind {
            ClauseKind::Join(join_type) => spans.join = Some((join_type, body)),
            ClauseKind::Where => spans.where_clause = Some(body),
            ClauseKind::GroupBy => spans.group_by = Some(body),
        }
    }

    Ok(spans)
}

fn find_markers(words: &[Word<'_>]) -> ParserResult<Vec<Marker>> {
    let mut markers = Vec::new();
    let mut i = 0;

    while i < words.len() {
        let word = words[i];

        if word.is("JOIN") {
            let type_word = i.checked_sub(1).map(|prev| words[prev]);
            let typed = type_word.and_then(|w| JoinType::from_keyword(w.text).ok());

            match (type_word, typed) {
                (Some(type_word), Some(join_type)) => markers.push(Marker {
                    kind: ClauseKind::Join(join_type),
                    start: type_word.start,
                    end: word.end,
                }),
                // After WHERE or GROUP BY an untyped JOIN is plain value text
                _ if past_join_position(&markers) => {}
                (Some(type_word), None) => {
                    return Err(ParserError::unsupported_join_type(type_word.text))
                }
                (None, _) => return Err(ParserError::unsupported_join_type(word.text)),
            }
        } else if word.is("WHERE") {
            markers.push(Marker {
                kind: ClauseKind::Where,
                start: word.start,
                end: word.end,
            });
        } else if word.is("GROUP") && words.get(i + 1).is_some_and(|next| next.is("BY")) {
            markers.push(Marker {
                kind: ClauseKind::GroupBy,
                start: word.start,
                end: words[i + 1].end,
            });
            i += 1;
        }

        i += 1;
    }

    Ok(markers)
}

fn past_join_position(markers: &[Marker]) -> bool {
    markers
        .iter()
        .any(|m| !matches!(m.kind, ClauseKind::Join(_)))
}
