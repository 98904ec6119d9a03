pub mod api;
pub mod archive;
pub mod highlight;
pub mod model;
pub mod render;
pub mod resolve;

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use time::{OffsetDateTime, macros::format_description};
use walkdir::WalkDir;

/// Extensions picked up by bulk mode, besides [`archive::COMPRESSED_EXTENSIONS`].
pub const LOG_EXTENSIONS: &[&str] = &["log", "txt", "out", "err"];

/// What the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// HTML fragment (line wrappers and highlight spans only).
    Fragment,
    /// Standalone HTML page with stylesheet.
    #[default]
    Page,
    /// JSON spans envelope.
    Json,
}

/// Options controlling how a log is highlighted and rendered.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub format: OutputFormat,
    pub render: render::RenderOptions,

    /// Patterns used when highlights are generated locally.
    pub patterns: highlight::PatternConfig,

    /// If set, read highlights from this JSON file instead of generating them.
    pub highlights_path: Option<PathBuf>,

    /// Print resolution summaries to stderr.
    pub verbose: bool,
}

/// Single file mode: read a local log, highlight, resolve and render it.
pub fn render_file(path: &Path, opts: &Options) -> Result<String, Box<dyn Error>> {
    let text = read_log_file(path)?;

    let highlights = match &opts.highlights_path {
        Some(hl_path) => resolve::parse_highlights(&fs::read_to_string(hl_path)?)?,
        None => opts.patterns.compile()?.highlight(&text),
    };

    let meta = render::page::PageMeta {
        title: path.to_string_lossy().to_string(),
        modified: file_mod_date(path).ok(),
    };
    render_output(&meta, &text, &highlights, opts)
}

/// Remote mode: fetch a log and its highlights from a log server, then render.
pub fn render_remote(base_url: &str, path: &str, opts: &Options) -> Result<String, Box<dyn Error>> {
    let resp = api::fetch_log(base_url, path)?;
    if opts.verbose {
        eprintln!("Fetched {} ({} bytes)", resp.file_path, resp.content.len());
    }

    let title = if resp.file_path.is_empty() {
        path.to_string()
    } else {
        resp.file_path.clone()
    };
    let meta = render::page::PageMeta {
        title,
        modified: None,
    };
    render_output(&meta, &resp.content, &resp.highlights, opts)
}

/// Resolve `highlights` over `text` and serialize in the requested format.
pub fn render_output(
    meta: &render::page::PageMeta,
    text: &str,
    highlights: &model::Highlights,
    opts: &Options,
) -> Result<String, Box<dyn Error>> {
    let spans = resolve::resolve_highlights(text, highlights)?;
    let line_count = spans.iter().filter(|s| s.starts_line()).count();

    if opts.verbose {
        let highlight_count: usize = highlights.values().map(Vec::len).sum();
        eprintln!(
            "Resolved {} highlights into {} spans over {} lines",
            highlight_count,
            spans.len(),
            line_count
        );
    }

    let out = match opts.format {
        OutputFormat::Fragment => render::render_html_with_options(text, &spans, &opts.render),
        OutputFormat::Page => render::page::render_page(meta, text, &spans, &opts.render),
        OutputFormat::Json => {
            let file = model::SpansFile {
                schema_version: model::SCHEMA_VERSION,
                generator: model::GeneratorInfo {
                    name: model::GENERATOR_NAME.to_string(),
                    version: model::GENERATOR_VERSION.to_string(),
                },
                span_encoding: model::SpanEncoding::default(),
                source: model::SourceInfo {
                    path: Some(meta.title.clone()),
                    byte_len: text.len() as u64,
                    line_count: line_count as u64,
                },
                spans,
            };
            // prettify JSON so it's easy to inspect / diff.
            serde_json::to_string_pretty(&file)?
        }
    };
    Ok(out)
}

/// Bulk mode: Walk the provided log root directory and render every log file
/// into the same relative location under the output root.
pub fn render_all_in_dirs(log_root: &Path, out_root: &Path, opts: &Options) -> Result<(), Box<dyn Error>> {
    let start_time = Instant::now();

    if !log_root.exists() {
        return Err(format!("Log directory not found: {}", log_root.display()).into());
    }

    let extension = match opts.format {
        OutputFormat::Json => "json",
        OutputFormat::Fragment | OutputFormat::Page => "html",
    };

    let mut entries: Vec<_> = WalkDir::new(log_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        LOG_EXTENSIONS.contains(&ext) || archive::COMPRESSED_EXTENSIONS.contains(&ext)
                    })
        })
        .collect();

    entries.sort_by(|a, b| a.path().cmp(b.path()));

    let total = entries.len();
    let mut count = 0;

    for entry in entries {
        let path = entry.path();
        // keep the same relative structure under the output root.
        let relative = path.strip_prefix(log_root)?;

        let mut out_path = out_root.join(relative);
        let mut file_name = out_path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".");
        file_name.push(extension);
        out_path.set_file_name(file_name);

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = render_file(path, opts)?;
        fs::write(&out_path, rendered)?;

        count += 1;

        let elapsed = start_time.elapsed();
        let total_ms = elapsed.as_millis();
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        eprintln!(
            "[{:>4}/{:>4}] [{:02}:{:02}.{:03}] Rendered: {:?}",
            count, total, mins, secs, ms, out_path
        );
    }

    let total_secs = start_time.elapsed().as_secs_f64();
    let avg_str = if count > 0 {
        format!("{:.3}s", total_secs / count as f64)
    } else {
        "-".to_string()
    };

    eprintln!(
        "Done. Rendered {} files in {:.3}s (avg {}/file).",
        count, total_secs, avg_str
    );
    Ok(())
}

/// Read a log file as text, decompressing `.gz`, `.bz2`, `.xz` and `.tar.gz` logs.
pub fn read_log_file(path: &Path) -> io::Result<String> {
    let bytes = archive::read_log_bytes(path)?;

    // logs are not always valid UTF-8; fallback to lossy conversion.
    Ok(String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).to_string()))
}

fn file_mod_date(path: &Path) -> io::Result<String> {
    let mtime = fs::metadata(path)?.modified()?;
    let dt = OffsetDateTime::from(mtime);
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    Ok(dt.format(&fmt).unwrap_or_else(|_| "1970-01-01 00:00:00 UTC".to_string()))
}
