//! The validation report and its renderings.

use crate::object::ObjectId;
use crate::schema::validator::{Severity, ValidationError};
use serde::Serialize;

/// Output formats for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// One object's outcome: identity plus its findings (possibly none).
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// Which object this entry is about.
    pub object: ObjectId,
    /// The component that produced the object.
    pub component: String,
    /// Findings, in discovery order.
    pub errors: Vec<ValidationError>,
}

impl ReportEntry {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.severity == Severity::Error)
    }
}

/// The terminal artifact of a run: one entry per expanded object, in
/// expansion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub entries: Vec<ReportEntry>,
}

impl ValidationReport {
    /// Number of objects validated.
    pub fn objects_validated(&self) -> usize {
        self.entries.len()
    }

    /// Number of objects with at least one finding.
    pub fn invalid_objects(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_clean()).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .flat_map(|e| e.errors.iter())
            .filter(|e| e.severity == severity)
            .count()
    }

    /// Whether the run passes: warnings alone do not fail it.
    pub fn passed(&self) -> bool {
        !self.entries.iter().any(ReportEntry::has_errors)
    }
}

/// Render a report in the given format.
pub fn format_report(report: &ValidationReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => format_plain(report),
        OutputFormat::Json => format_json(report),
    }
}

/// Human-readable rendering: one block per object carrying findings, clean
/// objects summarized as a count.
pub fn format_plain(report: &ValidationReport) -> String {
    let mut output = String::new();

    for entry in report.entries.iter().filter(|e| !e.is_clean()) {
        output.push_str(&format!(
            "{} (component '{}'):\n",
            entry.object, entry.component
        ));
        for error in &entry.errors {
            output.push_str(&format!("  {}\n", error));
        }
        output.push('\n');
    }

    let total = report.objects_validated();
    if report.invalid_objects() == 0 {
        output.push_str(&format!("All {} object(s) are valid.\n", total));
    } else {
        output.push_str(&format!(
            "Found {} error(s), {} warning(s) in {} of {} object(s).\n",
            report.error_count(),
            report.warning_count(),
            report.invalid_objects(),
            total,
        ));
    }

    output
}

/// Machine-readable rendering of the full report.
pub fn format_json(report: &ValidationReport) -> String {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        passed: bool,
        objects_validated: usize,
        errors: usize,
        warnings: usize,
        entries: &'a [ReportEntry],
    }

    let doc = JsonReport {
        passed: report.passed(),
        objects_validated: report.objects_validated(),
        errors: report.error_count(),
        warnings: report.warning_count(),
        entries: &report.entries,
    };

    serde_json::to_string_pretty(&doc).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
