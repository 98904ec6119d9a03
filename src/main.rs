use clap::{Parser, ValueEnum};
use loglight::highlight::PatternConfig;
use loglight::render::{LineFilter, RenderOptions};
use loglight::{Options, OutputFormat};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Fragment,
    Page,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Fragment => OutputFormat::Fragment,
            Format::Page => OutputFormat::Page,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Highlight log files by category and render them as HTML.
#[derive(Debug, Parser)]
#[command(name = "loglight", version, about)]
struct Cli {
    /// Log file to render (a server-side path when --server is given).
    #[arg(required_unless_present = "render_all")]
    file: Option<String>,

    /// Fetch the file and its highlights from this log server instead of reading it locally.
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Read highlights from a JSON file (`{"label": [{"start": .., "end": ..}]}`).
    #[arg(long, value_name = "JSON", conflicts_with = "server")]
    highlights: Option<PathBuf>,

    /// YAML file with highlight patterns.
    #[arg(long, value_name = "YAML")]
    patterns: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "page")]
    format: Format,

    /// Dim lines that do not match this regex.
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Dim lines that match the filter instead.
    #[arg(long, requires = "filter")]
    invert_filter: bool,

    /// Match the filter case-insensitively.
    #[arg(long, requires = "filter")]
    ignore_case: bool,

    /// Categories enabled on the page (default: every category present).
    #[arg(long = "enable", value_name = "LABEL")]
    enable: Vec<String>,

    /// Write output here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Render every log under --log-dir into --out-dir.
    #[arg(long, requires_all = ["log_dir", "out_dir"], conflicts_with_all = ["file", "server", "highlights"])]
    render_all: bool,

    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Print resolution summaries to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn build_options(cli: &Cli) -> Result<Options, Box<dyn Error>> {
    let patterns = match &cli.patterns {
        Some(path) => PatternConfig::load(path)?,
        None => PatternConfig::default(),
    };

    let line_filter = match &cli.filter {
        Some(pattern) => Some(LineFilter::new(pattern, cli.ignore_case, cli.invert_filter)?),
        None => None,
    };

    let render = RenderOptions {
        line_filter,
        enabled: (!cli.enable.is_empty()).then(|| cli.enable.clone()),
        ..RenderOptions::default()
    };

    Ok(Options {
        format: cli.format.into(),
        render,
        patterns,
        highlights_path: cli.highlights.clone(),
        verbose: cli.verbose,
    })
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let opts = build_options(cli)?;

    if cli.render_all {
        let (Some(log_dir), Some(out_dir)) = (&cli.log_dir, &cli.out_dir) else {
            return Err("--render-all requires --log-dir and --out-dir".into());
        };
        return loglight::render_all_in_dirs(log_dir, out_dir, &opts);
    }

    let file = cli.file.as_deref().ok_or("missing log file")?;
    let rendered = match &cli.server {
        Some(base) => loglight::render_remote(base, file, &opts)?,
        None => loglight::render_file(Path::new(file), &opts)?,
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
