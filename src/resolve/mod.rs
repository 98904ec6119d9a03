//! Interval -> span resolver.
//!
//! Turns raw text plus possibly overlapping labeled intervals into a flat,
//! ordered list of spans with a constant label set each, and computes for every
//! line the union of labels active anywhere on it.
//!
//! The resolver is a sweep line over interval boundaries:
//! - every line contributes a synthetic interval with the reserved line label,
//! - intervals are ordered by start, widest first on ties,
//! - at each boundary, ending labels are removed before starting labels are added.

mod lines;

pub use lines::*;

use crate::model::*;
use std::collections::BTreeMap;

/// Labels starting and ending at one offset.
#[derive(Debug, Default)]
struct Boundary<'a> {
    starts: Vec<&'a str>,
    ends: Vec<&'a str>,
}

/// Parse the `highlights` JSON object of an `/api/log` reply.
pub fn parse_highlights(json: &str) -> ResolveResult<Highlights> {
    serde_json::from_str(json).map_err(|e| {
        ResolveError::MalformedInput(format!("highlights must map labels to [{{start, end}}]: {e}"))
    })
}

/// Resolve a server-style highlight map against `text`.
///
/// The reserved line label may appear as a key, but only with no ranges (the
/// log server always sends it empty).
pub fn resolve_highlights(text: &str, highlights: &Highlights) -> ResolveResult<Vec<OutputSpan>> {
    if let Some(reserved) = highlights.get(LINE_LABEL)
        && !reserved.is_empty()
    {
        return Err(ResolveError::MalformedInput(format!(
            "label {LINE_LABEL:?} is reserved for line wrappers"
        )));
    }

    let intervals: Vec<Interval> = flatten_highlights(highlights)
        .into_iter()
        .filter(|i| i.label != LINE_LABEL)
        .collect();
    resolve(text, &intervals)
}

/// Resolve labeled intervals over `text` into ordered output spans.
///
/// Fails fast (no partial output) if any interval is reversed, out of range,
/// splits a UTF-8 character, or uses an empty/reserved label.
pub fn resolve(text: &str, intervals: &[Interval]) -> ResolveResult<Vec<OutputSpan>> {
    validate_intervals(text, intervals)?;

    let lines = collect_lines(text);
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    // zero-length intervals never produce a boundary; they cover nothing.
    let mut combined: Vec<Interval> = intervals.iter().filter(|i| !i.is_empty()).cloned().collect();
    combined.extend(
        lines
            .iter()
            .map(|l| Interval::new(l.start, l.end_with_newline, LINE_LABEL)),
    );
    combined.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut boundaries: BTreeMap<usize, Boundary<'_>> = BTreeMap::new();
    for iv in &combined {
        boundaries.entry(iv.start).or_default().starts.push(&iv.label);
        boundaries.entry(iv.end).or_default().ends.push(&iv.label);
    }

    // sweep. the active set is reference-counted so overlapping intervals of the
    // same label keep it active until the last one ends.
    let mut active: BTreeMap<&str, usize> = BTreeMap::new();
    let mut stops: Vec<(usize, LabelSet)> = Vec::with_capacity(boundaries.len());
    for (&offset, boundary) in &boundaries {
        for &label in &boundary.ends {
            let remaining = match active.get_mut(label) {
                Some(count) => {
                    *count -= 1;
                    *count
                }
                None => continue,
            };
            if remaining == 0 {
                active.remove(label);
            }
        }
        for &label in &boundary.starts {
            *active.entry(label).or_insert(0) += 1;
        }

        let labels: LabelSet = active
            .keys()
            .filter(|l| **l != LINE_LABEL)
            .copied()
            .collect();
        stops.push((offset, labels));
    }

    let mut spans: Vec<OutputSpan> = Vec::with_capacity(stops.len().saturating_sub(1));
    let mut line_iter = lines.iter().enumerate().peekable();
    let mut line_first_span = 0usize;
    let mut line_labels = LabelSet::new();

    for pair in stops.windows(2) {
        let (start, labels) = (&pair[0].0, &pair[0].1);
        let end = pair[1].0;

        let mut span = OutputSpan {
            start: *start,
            end,
            labels: labels.clone(),
            line: None,
            line_end: false,
        };

        if let Some((index, line)) = line_iter.peek()
            && line.start == *start
        {
            span.line = Some(LineInfo {
                index: *index,
                labels: LabelSet::new(),
            });
            line_first_span = spans.len();
            line_labels = LabelSet::new();
        }

        line_labels.extend_from(&span.labels);

        let closes_line = line_iter
            .peek()
            .is_some_and(|(_, line)| line.end_with_newline == end);
        spans.push(span);

        if closes_line {
            if let Some(last) = spans.last_mut() {
                last.line_end = true;
            }
            if let Some(info) = spans[line_first_span].line.as_mut() {
                info.labels = std::mem::take(&mut line_labels);
            }
            line_iter.next();
        }
    }

    Ok(spans)
}

fn validate_intervals(text: &str, intervals: &[Interval]) -> ResolveResult<()> {
    let len = text.len();
    for iv in intervals {
        if iv.label.is_empty() {
            return Err(ResolveError::MalformedInput(format!(
                "interval [{}, {}) has an empty label",
                iv.start, iv.end
            )));
        }
        if iv.label == LINE_LABEL {
            return Err(ResolveError::MalformedInput(format!(
                "label {LINE_LABEL:?} is reserved for line wrappers"
            )));
        }
        // labels become single class names.
        if iv.label.chars().any(char::is_whitespace) {
            return Err(ResolveError::MalformedInput(format!(
                "label {:?} must not contain whitespace",
                iv.label
            )));
        }

        let reason = if iv.start > iv.end {
            Some("start is after end")
        } else if iv.end > len {
            Some("offset out of range")
        } else if !text.is_char_boundary(iv.start) || !text.is_char_boundary(iv.end) {
            Some("offset splits a UTF-8 character")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(ResolveError::InvalidInterval {
                label: iv.label.clone(),
                start: iv.start,
                end: iv.end,
                len,
                reason,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ls: &[&str]) -> LabelSet {
        ls.iter().copied().collect()
    }

    fn texts<'a>(text: &'a str, spans: &[OutputSpan]) -> Vec<&'a str> {
        spans.iter().map(|s| s.text(text)).collect()
    }

    #[test]
    fn empty_text_yields_no_spans() {
        assert!(resolve("", &[]).unwrap().is_empty());
    }

    #[test]
    fn no_intervals_yields_one_wrapper_per_line() {
        let text = "line1\nline2";
        let spans = resolve(text, &[]).unwrap();
        assert_eq!(texts(text, &spans), vec!["line1\n", "line2"]);
        for (i, s) in spans.iter().enumerate() {
            assert!(s.labels.is_empty());
            assert!(s.line_end);
            let line = s.line.as_ref().expect("line start");
            assert_eq!(line.index, i);
            assert!(line.labels.is_empty());
        }
    }

    #[test]
    fn single_interval_splits_into_three_spans() {
        let text = "abcdef";
        let spans = resolve(text, &[Interval::new(1, 3, "error")]).unwrap();
        assert_eq!(texts(text, &spans), vec!["a", "bc", "def"]);
        assert_eq!(spans[0].labels, LabelSet::new());
        assert_eq!(spans[1].labels, labels(&["error"]));
        assert_eq!(spans[2].labels, LabelSet::new());

        assert_eq!(spans[0].line.as_ref().unwrap().labels, labels(&["error"]));
        assert!(spans[1].line.is_none() && spans[2].line.is_none());
        assert_eq!(
            spans.iter().map(|s| s.line_end).collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }

    #[test]
    fn wider_interval_opens_first_on_shared_start() {
        let text = "abc";
        let spans = resolve(
            text,
            &[Interval::new(0, 1, "y"), Interval::new(0, 3, "x")],
        )
        .unwrap();
        assert_eq!(texts(text, &spans), vec!["a", "bc"]);
        assert_eq!(spans[0].labels, labels(&["x", "y"]));
        assert_eq!(spans[1].labels, labels(&["x"]));
    }

    #[test]
    fn out_of_range_interval_is_rejected() {
        let err = resolve("abc", &[Interval::new(5, 6, "x")]).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidInterval { start: 5, end: 6, len: 3, .. }));
    }

    #[test]
    fn reversed_interval_is_rejected() {
        let err = resolve("abc", &[Interval::new(2, 1, "x")]).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidInterval {
                reason: "start is after end",
                ..
            }
        ));
    }

    #[test]
    fn interval_inside_multibyte_char_is_rejected() {
        let err = resolve("é!", &[Interval::new(1, 3, "x")]).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidInterval { .. }));
    }

    #[test]
    fn reserved_and_empty_labels_are_malformed() {
        assert!(matches!(
            resolve("abc", &[Interval::new(0, 1, LINE_LABEL)]),
            Err(ResolveError::MalformedInput(_))
        ));
        assert!(matches!(
            resolve("abc", &[Interval::new(0, 1, "")]),
            Err(ResolveError::MalformedInput(_))
        ));
    }

    #[test]
    fn labels_with_whitespace_are_malformed() {
        for label in ["a b", "tab\there", "trailing\n"] {
            let err = resolve("abc", &[Interval::new(0, 1, label)]).unwrap_err();
            assert!(matches!(err, ResolveError::MalformedInput(_)), "{label:?}: {err}");
        }
    }

    #[test]
    fn zero_length_interval_covers_nothing() {
        let text = "abc";
        let spans = resolve(text, &[Interval::new(1, 1, "x")]).unwrap();
        assert_eq!(texts(text, &spans), vec!["abc"]);
        assert!(spans[0].labels.is_empty());
        assert!(spans[0].line.as_ref().unwrap().labels.is_empty());
    }

    #[test]
    fn adjacent_same_label_intervals_do_not_double_nest() {
        let text = "abcd";
        let spans = resolve(
            text,
            &[Interval::new(0, 2, "e"), Interval::new(2, 4, "e")],
        )
        .unwrap();
        assert_eq!(texts(text, &spans), vec!["ab", "cd"]);
        assert!(spans.iter().all(|s| s.labels == labels(&["e"])));
    }

    #[test]
    fn overlapping_same_label_stays_active_until_last_end() {
        let text = "abcdef";
        let spans = resolve(
            text,
            &[Interval::new(0, 3, "e"), Interval::new(1, 5, "e")],
        )
        .unwrap();
        assert_eq!(texts(text, &spans), vec!["a", "bc", "de", "f"]);
        assert_eq!(spans[2].labels, labels(&["e"]));
        assert!(spans[3].labels.is_empty());
    }

    #[test]
    fn crossing_intervals_split_at_every_boundary() {
        let text = "abcdef";
        let spans = resolve(
            text,
            &[Interval::new(0, 4, "x"), Interval::new(2, 6, "y")],
        )
        .unwrap();
        assert_eq!(texts(text, &spans), vec!["ab", "cd", "ef"]);
        assert_eq!(spans[0].labels, labels(&["x"]));
        assert_eq!(spans[1].labels, labels(&["x", "y"]));
        assert_eq!(spans[2].labels, labels(&["y"]));
    }

    #[test]
    fn interval_across_newline_marks_both_lines() {
        let text = "ab\ncd\nef";
        let spans = resolve(text, &[Interval::new(1, 4, "e")]).unwrap();
        assert_eq!(texts(text, &spans), vec!["a", "b\n", "c", "d\n", "ef"]);

        let line_labels: Vec<LabelSet> = spans
            .iter()
            .filter_map(|s| s.line.as_ref().map(|l| l.labels.clone()))
            .collect();
        assert_eq!(line_labels, vec![labels(&["e"]), labels(&["e"]), LabelSet::new()]);
        assert_eq!(
            spans.iter().map(|s| s.line_end).collect::<Vec<_>>(),
            vec![false, true, false, true, true]
        );
    }

    #[test]
    fn blank_lines_get_their_own_wrapper() {
        let text = "a\n\nb";
        let spans = resolve(text, &[]).unwrap();
        assert_eq!(texts(text, &spans), vec!["a\n", "\n", "b"]);
        assert!(spans.iter().all(|s| s.line.is_some() && s.line_end));
    }

    #[test]
    fn resolve_highlights_accepts_empty_reserved_key() {
        let hl = parse_highlights(r#"{"all": [], "error": [{"start": 0, "end": 3}]}"#).unwrap();
        let spans = resolve_highlights("err ok", &hl).unwrap();
        assert_eq!(texts("err ok", &spans), vec!["err", " ok"]);
    }

    #[test]
    fn resolve_highlights_rejects_populated_reserved_key() {
        let hl = parse_highlights(r#"{"all": [{"start": 0, "end": 1}]}"#).unwrap();
        assert!(matches!(
            resolve_highlights("abc", &hl),
            Err(ResolveError::MalformedInput(_))
        ));
    }

    #[test]
    fn parse_highlights_rejects_wrong_shape() {
        for bad in [r#"[1, 2]"#, r#"{"error": [{"start": -1, "end": 2}]}"#, r#"{"error": 3}"#] {
            assert!(
                matches!(parse_highlights(bad), Err(ResolveError::MalformedInput(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn resolving_twice_is_identical() {
        let text = "2024-01-01 00:00:00 ERROR boom\nwarn <x>\n";
        let ivs = [
            Interval::new(0, 19, "datetime"),
            Interval::new(20, 25, "error"),
            Interval::new(31, 35, "warning"),
        ];
        assert_eq!(resolve(text, &ivs).unwrap(), resolve(text, &ivs).unwrap());
    }
}
