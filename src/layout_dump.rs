use crate::layout::{LayoutResult, Severity};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Condensed view of a layout for logs and the `--validate` report.
#[derive(Debug, Serialize)]
pub struct LayoutSummary {
    pub algorithm: String,
    pub branches: usize,
    pub children: usize,
    pub connections: usize,
    pub width: f64,
    pub height: f64,
    pub is_valid: bool,
    pub warnings: usize,
    pub critical: usize,
    pub overlaps: usize,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LayoutSummary {
    pub fn from_layout(layout: &LayoutResult) -> Self {
        let report = &layout.validation;
        LayoutSummary {
            algorithm: layout.algorithm.clone(),
            branches: layout.params.num_branches,
            children: layout.params.num_children,
            connections: layout.connections.len(),
            width: layout.params.width,
            height: layout.params.height,
            is_valid: report.is_valid,
            warnings: report.count(Severity::Warning),
            critical: report.count(Severity::Critical),
            overlaps: report.count(Severity::Overlap),
            summary: report.summary.clone(),
            error: layout.error.clone(),
        }
    }
}

pub fn write_json<T: Serialize>(
    writer: impl Write,
    value: &T,
    pretty: bool,
) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(writer);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes a layout as JSON to `path`, or to stdout when no path is given.
pub fn write_layout<T: Serialize>(
    path: Option<&Path>,
    layout: &T,
    pretty: bool,
) -> anyhow::Result<()> {
    match path {
        Some(path) => write_json(File::create(path)?, layout, pretty),
        None => write_json(io::stdout().lock(), layout, pretty),
    }
}
