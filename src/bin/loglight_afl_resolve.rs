//! AFL++ fuzz target for the `loglight` resolver.
//!
//! This binary is stdin-driven, so it can be used with AFL++.
//! Build and run it via `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin loglight_afl_resolve
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/loglight_afl_resolve
//! ```
//!
//! The first input byte (mod 8) picks how many intervals are derived from the
//! remaining bytes; everything after the interval header is the log text.
//!
//! Rust panics normally unwind and exit with a non-crashing status code.
//! AFL++ only treats crashes as signals/aborts. We therefore catch any unwind
//! and turn it into `abort()`.

use std::io::Read;

use loglight::highlight::Highlighter;
use loglight::model::*;
use loglight::{render, resolve};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.
const LABELS: &[&str] = &["a", "b", "c", "error"];

fn derive_intervals(header: &[u8], text: &str) -> Vec<Interval> {
    let len = text.len().max(1);
    header
        .chunks_exact(3)
        .map(|c| {
            let mut start = c[0] as usize * len / 256;
            let mut end = start + (c[1] as usize * len / 256);
            end = end.min(text.len());
            start = start.min(end);
            // snap to char boundaries so the input is always valid.
            while !text.is_char_boundary(start) {
                start -= 1;
            }
            while !text.is_char_boundary(end) {
                end += 1;
            }
            Interval::new(start, end, LABELS[c[2] as usize % LABELS.len()])
        })
        .collect()
}

fn check_spans(text: &str, intervals: &[Interval], spans: &[OutputSpan]) {
    // partition: spans tile [0, len) in order.
    let mut pos = 0usize;
    for s in spans {
        assert_eq!(s.start, pos, "gap or overlap at {pos}: {s:?}");
        assert!(s.start < s.end, "empty span: {s:?}");
        pos = s.end;
    }
    assert_eq!(pos, text.len(), "spans do not cover the text");

    // coverage: each span carries exactly the labels covering it.
    for s in spans {
        let want: LabelSet = intervals
            .iter()
            .filter(|iv| iv.start <= s.start && s.end <= iv.end && !iv.is_empty())
            .map(|iv| iv.label.as_str())
            .collect();
        assert_eq!(s.labels, want, "label mismatch for {s:?}");
    }
}

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN || data.is_empty() {
        return;
    }

    let count = (data[0] % 8) as usize;
    let header_len = (1 + count * 3).min(data.len());
    let header = &data[1..header_len];

    // AFL++ will happily hand us arbitrary bytes; lossy conversion keeps the harness total.
    let text = String::from_utf8_lossy(&data[header_len..]).to_string();
    let intervals = derive_intervals(header, &text);

    let spans = resolve::resolve(&text, &intervals).unwrap();
    check_spans(&text, &intervals, &spans);

    // generated highlights must always resolve.
    let highlighter = Highlighter::with_defaults().unwrap();
    let generated = highlighter.highlight(&text);
    let spans = resolve::resolve_highlights(&text, &generated).unwrap();

    // rendering should never panic.
    let _html = render::render_html(&text, &spans);
}

fn main() {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data).unwrap();

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}
