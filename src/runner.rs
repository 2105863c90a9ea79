//! Orchestration of the validation pass.
//!
//! The runner validates every expanded object, never skipping the rest of
//! the sequence because one object failed, and turns the collected findings
//! into a report plus an overall pass/fail verdict. Only discovery failures
//! abort it.

use crate::error::{DiscoveryError, Error};
use crate::object::StructuredObject;
use crate::report::{format_report, OutputFormat, ReportEntry, ValidationReport};
use crate::schema::source::SchemaSource;
use crate::schema::validator::{validate, ValidationOptions};
use rayon::prelude::*;
use std::io::Write;

/// Options for one validation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub validation: ValidationOptions,
    pub format: OutputFormat,
    /// Validate objects on rayon workers. Safe because validation is a pure
    /// function of (object, schema) and the schema cache is primed before
    /// fanning out.
    pub parallel: bool,
}

/// Runs the schema validator over an expanded object sequence.
pub struct ValidationRunner<'a> {
    source: &'a SchemaSource,
    options: RunOptions,
}

impl<'a> ValidationRunner<'a> {
    pub fn new(source: &'a SchemaSource, options: RunOptions) -> Self {
        Self { source, options }
    }

    /// Validate all objects and build the report, one entry per object in
    /// input order.
    pub fn validate_all(
        &self,
        objects: &[StructuredObject],
    ) -> Result<ValidationReport, DiscoveryError> {
        let entries = if self.options.parallel && !objects.is_empty() {
            // Prime the schema cache so workers never race the fetch.
            self.source.index()?;
            objects
                .par_iter()
                .map(|obj| self.entry_for(obj))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            let mut entries = Vec::with_capacity(objects.len());
            for obj in objects {
                entries.push(self.entry_for(obj)?);
            }
            entries
        };

        Ok(ValidationReport { entries })
    }

    fn entry_for(&self, object: &StructuredObject) -> Result<ReportEntry, DiscoveryError> {
        let errors = validate(object, self.source, &self.options.validation)?;
        Ok(ReportEntry {
            object: object.identifier(),
            component: object.source.component.clone(),
            errors,
        })
    }

    /// Validate, write the rendered report to `out`, and return whether the
    /// run passed.
    pub fn run(&self, objects: &[StructuredObject], out: &mut dyn Write) -> Result<bool, Error> {
        let report = self.validate_all(objects)?;
        write!(out, "{}", format_report(&report, self.options.format))?;
        Ok(report.passed())
    }
}
