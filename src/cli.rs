use crate::config::{LayoutConfig, load_config};
use crate::layout::{LayoutResult, layout_spec, layout_spec_str, spec_error_layout};
use crate::layout_dump::{LayoutSummary, write_json, write_layout};
use crate::parser::parse_value;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mmlayout", version, about = "Balanced two-level mind map layout")]
pub struct Args {
    /// Input spec file (.json) or '-' for stdin. A JSON array lays out each spec.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON or JSON5) overriding layout defaults
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long = "compact")]
    pub compact: bool,

    /// Print the validation summary to stderr
    #[arg(long = "validate")]
    pub validate: bool,

    /// Log format on stderr
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mindmap_layout=info,mmlayout=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);
    let config = load_config(args.config.as_deref()).with_context(|| {
        format!(
            "failed to load config {}",
            args.config.as_deref().unwrap_or(Path::new("-")).display()
        )
    })?;

    let input = read_input(args.input.as_deref())?;
    let (layouts, batch) = layout_input(&input, &config);
    info!(count = layouts.len(), batch, "computed layouts");

    if args.validate {
        for (idx, layout) in layouts.iter().enumerate() {
            report_validation(idx, layout)?;
        }
    }

    let pretty = !args.compact;
    match (batch, layouts.as_slice()) {
        (false, [single]) => write_layout(args.output.as_deref(), single, pretty)?,
        (_, all) => write_layout(args.output.as_deref(), &all, pretty)?,
    }

    let degraded: Vec<&str> = layouts
        .iter()
        .filter_map(|layout| layout.error.as_deref())
        .collect();
    if !degraded.is_empty() {
        return Err(anyhow::anyhow!(
            "{} of {} layouts degraded: {}",
            degraded.len(),
            layouts.len(),
            degraded.join("; ")
        ));
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

/// Lays out one spec, or each spec of a top-level array on its own thread.
/// The flag reports whether the input was such a batch.
fn layout_input(input: &str, config: &LayoutConfig) -> (Vec<LayoutResult>, bool) {
    match parse_value(input) {
        Ok(Value::Array(specs)) => (layout_batch(&specs, config), true),
        Ok(spec) => (vec![layout_spec(&spec, config)], false),
        Err(_) => (vec![layout_spec_str(input, config)], false),
    }
}

fn layout_batch(specs: &[Value], config: &LayoutConfig) -> Vec<LayoutResult> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = specs
            .iter()
            .map(|spec| scope.spawn(move || layout_spec(spec, config)))
            .collect();
        handles
            .into_iter()
            .zip(specs)
            .map(|(handle, spec)| {
                handle.join().unwrap_or_else(|_| {
                    spec_error_layout(spec, "layout worker panicked", config)
                })
            })
            .collect()
    })
}

fn report_validation(idx: usize, layout: &LayoutResult) -> Result<()> {
    let summary = LayoutSummary::from_layout(layout);
    eprintln!(
        "layout {}: {} ({})",
        idx + 1,
        summary.summary,
        if summary.is_valid { "valid" } else { "invalid" }
    );
    for issue in &layout.validation.details {
        eprintln!("  [{}] {}", issue.severity, issue.message);
    }
    write_json(io::stderr().lock(), &summary, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_spec_is_not_a_batch() {
        let (layouts, batch) = layout_input(
            r#"{"topic": "AI", "children": [{"label": "ML"}]}"#,
            &LayoutConfig::default(),
        );
        assert!(!batch);
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].params.num_branches, 1);
    }

    #[test]
    fn arrays_are_laid_out_independently() {
        let input = r#"[
            {"topic": "A", "children": [{"label": "x", "children": [{"text": "y"}]}]},
            {"topic": "B"},
            {"children": []}
        ]"#;
        let (layouts, batch) = layout_input(input, &LayoutConfig::default());
        assert!(batch);
        assert_eq!(layouts.len(), 3);
        assert_eq!(layouts[0].positions.len(), 3);
        assert_eq!(layouts[1].positions.len(), 1);
        assert!(layouts[1].error.is_none());
        assert!(layouts[2].error.is_some());
    }

    #[test]
    fn unparsable_input_degrades() {
        let (layouts, batch) = layout_input("{{{", &LayoutConfig::default());
        assert!(!batch);
        assert!(layouts[0].is_degraded());
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "mmlayout",
            "-i",
            "spec.json",
            "--configFile",
            "layout.json5",
            "--compact",
            "--log-format",
            "json",
        ]);
        assert_eq!(args.input.as_deref(), Some(Path::new("spec.json")));
        assert_eq!(args.config.as_deref(), Some(Path::new("layout.json5")));
        assert!(args.compact);
        assert!(!args.validate);
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
