use crate::domain::entities::report::Report;
use crate::domain::error::DomainError;
use std::path::{Path, PathBuf};

/// Persists reports as UTF-8 markdown files under one directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `report` and returns the file path. A same-second duplicate
    /// overwrites the earlier file.
    pub fn save(&self, report: &Report) -> Result<PathBuf, DomainError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| DomainError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.output_dir.join(file_name(report));
        std::fs::write(&path, report.to_markdown()).map_err(|source| DomainError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), report_id = %report.id, "report saved");
        Ok(path)
    }
}

/// `{T1-T2}_{YYYYMMDDTHHMMSSZ}.md`
pub fn file_name(report: &Report) -> String {
    let subject = if report.tickers.is_empty() {
        "report".to_string()
    } else {
        report.tickers.join("-")
    };
    format!(
        "{subject}_{}.md",
        report.generated_at.format("%Y%m%dT%H%M%SZ")
    )
}
