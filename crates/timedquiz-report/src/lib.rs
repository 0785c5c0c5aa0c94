//! timedquiz-report — Export of finished exams.
//!
//! Reports are written once for the user to keep; nothing here reads them back.

pub mod html;

use std::path::Path;

use anyhow::Result;

use timedquiz_core::report::ExamReport;

/// Export formats, picked from the output file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Html,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("html" | "htm") => Ok(Self::Html),
            _ => anyhow::bail!(
                "unsupported export format: {} (use .json or .html)",
                path.display()
            ),
        }
    }
}

/// Write `report` to `path` in the format its extension names.
pub fn write_report(report: &ExamReport, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path)?;
    match format {
        ExportFormat::Json => report.save_json(path)?,
        ExportFormat::Html => html::write_html_report(report, path)?,
    }
    tracing::info!("exam report written to {}", path.display());
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/result.json")).unwrap(),
            ExportFormat::Json
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("result.HTML")).unwrap(),
            ExportFormat::Html
        );
        assert!(ExportFormat::from_path(Path::new("result.csv")).is_err());
        assert!(ExportFormat::from_path(Path::new("result")).is_err());
    }
}
