//! Scan report writers: pretty JSON for tooling, plain text for people.
//!
//! No colors here; the `check` command colors its own single verdict.

use std::io::Write;

use crate::error::FileRejection;
use crate::report::ValidationReport;

const WIDTH: usize = 80;

/// Pretty-printed JSON, one document per report.
///
/// # Errors
///
/// Serialization or I/O failures.
pub fn write_json(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Counts, scan errors and rejections, followed by fix hints when anything failed.
///
/// # Errors
///
/// I/O failures on `writer`.
pub fn write_human(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let heavy = "=".repeat(WIDTH);
    writeln!(writer, "\n{heavy}\n  FRAGMENT CONTENT VALIDATOR\n{heavy}\n")?;
    for (label, count) in [
        ("attempted", report.files_attempted()),
        ("scanned", report.scanned_files),
        ("accepted", report.accepted_files),
        ("rejected", report.rejections_count()),
        ("failed", report.failed_files),
    ] {
        writeln!(writer, "  {:<18}{count}", format!("Files {label}:"))?;
    }
    writeln!(writer)?;

    write_section(
        writer,
        "SCAN ERRORS (files that could not be validated)",
        report.scan_errors.iter().map(ToString::to_string),
    )?;
    write_section(
        writer,
        "REJECTED FILES",
        report
            .rejections
            .iter()
            .map(FileRejection::format_human_readable),
    )?;

    writeln!(writer, "{heavy}")?;
    if report.ok {
        writeln!(
            writer,
            "\u{2713} All {} files passed validation",
            report.scanned_files
        )?;
    } else {
        write_failure_summary(report, writer)?;
    }
    writeln!(writer, "{heavy}")?;
    Ok(())
}

/// A titled block of lines; nothing at all when there are no lines.
fn write_section(
    writer: &mut dyn Write,
    title: &str,
    lines: impl Iterator<Item = String>,
) -> anyhow::Result<()> {
    let mut lines = lines.peekable();
    if lines.peek().is_none() {
        return Ok(());
    }
    let light = "-".repeat(WIDTH);
    writeln!(writer, "{light}\n  {title}\n{light}")?;
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_failure_summary(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    if !report.scan_errors.is_empty() {
        writeln!(
            writer,
            "\u{2717} {} file(s) could not be scanned",
            report.failed_files
        )?;
    }
    if report.rejections.is_empty() {
        return Ok(());
    }

    writeln!(
        writer,
        "\u{2717} {} file(s) rejected\n\n  To fix:",
        report.rejections_count()
    )?;
    let is_image = |r: &FileRejection| r.media_type.starts_with("image/");
    if report.rejections.iter().any(is_image) {
        writeln!(
            writer,
            "    - Image files must start with the signature of their extension's format"
        )?;
    }
    if !report.rejections.iter().all(is_image) {
        writeln!(
            writer,
            "    - Text files must parse as the format their extension declares"
        )?;
    }
    Ok(())
}
