/// A byte range for a single line in the source.
///
/// - `start..end` is the line content excluding the trailing `\n`.
/// - `end_with_newline` is `end` or `end+1` if the line ended with `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
    pub end_with_newline: usize,
}

/// Split `src` into `\n`-terminated lines.
///
/// The newline belongs to the line it terminates. A final unterminated line is
/// only included when non-empty, so `"a\n"` is one line and `""` has none.
pub fn collect_lines(src: &str) -> Vec<LineRange> {
    let bytes = src.as_bytes();
    let mut out: Vec<LineRange> = Vec::new();
    let mut start = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'\n' {
            out.push(LineRange {
                start,
                end: i,
                end_with_newline: i + 1,
            });
            start = i + 1;
        }
    }
    if start < src.len() {
        out.push(LineRange {
            start,
            end: src.len(),
            end_with_newline: src.len(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_belongs_to_its_line() {
        let lines = collect_lines("line1\nline2");
        assert_eq!(
            lines,
            vec![
                LineRange {
                    start: 0,
                    end: 5,
                    end_with_newline: 6
                },
                LineRange {
                    start: 6,
                    end: 11,
                    end_with_newline: 11
                },
            ]
        );
    }

    #[test]
    fn trailing_newline_adds_no_empty_line() {
        assert_eq!(collect_lines("a\n").len(), 1);
        assert!(collect_lines("").is_empty());
    }

    #[test]
    fn blank_lines_are_never_zero_length() {
        let lines = collect_lines("\n\nx");
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.start < l.end_with_newline));
        assert_eq!(lines[0].end, lines[0].start);
    }
}
