use anyhow::Result;
use serde::Serialize;

use crate::annotation::Annotation;
use crate::cli::{OutputFormat, Target};

#[derive(Debug, Serialize)]
pub struct AnnotationReport<'a> {
    pub target: String,
    pub total_annotations: usize,
    pub annotations: &'a [Annotation],
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format(
        target: &Target,
        annotations: &[Annotation],
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let report = Self::build_report(target, annotations);
                Ok(serde_json::to_string_pretty(&report)?)
            }
            OutputFormat::Text => Ok(Self::format_text(target, annotations)),
        }
    }

    pub fn build_report<'a>(
        target: &Target,
        annotations: &'a [Annotation],
    ) -> AnnotationReport<'a> {
        AnnotationReport {
            target: target.to_string(),
            total_annotations: annotations.len(),
            annotations,
        }
    }

    fn format_text(target: &Target, annotations: &[Annotation]) -> String {
        let mut lines = vec![format!("{target}: {} annotation(s)", annotations.len())];
        lines.extend(annotations.iter().map(|annotation| format!("  {annotation}")));
        lines.join("\n")
    }
}
