// Append-only CSV-style result log
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub const HEADER: &str = "test,passed,notes,timestamp";

/// `yyyyMMdd_HHmmss`, shared with screenshot file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub test: String,
    pub passed: bool,
    pub notes: String,
    pub timestamp: DateTime<Local>,
}

impl ResultRecord {
    pub fn new(test: impl Into<String>, passed: bool, notes: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            passed,
            notes: notes.into(),
            timestamp: Local::now(),
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.passed { "PASS" } else { "FAIL" }
    }

    /// One log line, newline terminated. Notes never break the column layout.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{}\n",
            self.test,
            self.verdict(),
            sanitize_notes(&self.notes),
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }
}

fn sanitize_notes(notes: &str) -> String {
    notes
        .replace(',', ";")
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    /// Create (or truncate) the log and write the header line.
    pub async fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, format!("{HEADER}\n")).await?;
        log::debug!("Result log created at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &ResultRecord) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(record.to_line().as_bytes()).await?;
        file.flush().await
    }
}
