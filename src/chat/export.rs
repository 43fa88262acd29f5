//! Transcript export to `<log-dir>/<unix-timestamp>.json`.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::transcript::Transcript;
use crate::error::ExportError;

const EXPORT_SUFFIX: &str = ".json";

/// Writes transcripts as JSON arrays of `{role, content}` objects.
#[derive(Debug, Clone)]
pub struct TranscriptExporter {
    log_dir: PathBuf,
}

impl TranscriptExporter {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    /// Export using the current wall-clock second as the file stem.
    pub fn export(&self, transcript: &Transcript) -> Result<PathBuf, ExportError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.export_at(transcript, now)
    }

    /// Export with an explicit timestamp.
    ///
    /// When `<ts>.json` already exists the first free `<ts>-N.json` is used.
    /// The payload lands under its final name only once fully written.
    pub fn export_at(
        &self,
        transcript: &Transcript,
        unix_secs: u64,
    ) -> Result<PathBuf, ExportError> {
        let payload = serde_json::to_vec(transcript.messages())?;
        fs::create_dir_all(&self.log_dir).map_err(|source| ExportError::Io {
            path: self.log_dir.clone(),
            source,
        })?;

        let target = self.reserve_path(unix_secs)?;
        let tmp = temp_sibling(&target);
        if let Err(source) = fs::write(&tmp, &payload) {
            let _ = fs::remove_file(&tmp);
            let _ = fs::remove_file(&target);
            return Err(ExportError::Io { path: tmp, source });
        }
        if let Err(source) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            let _ = fs::remove_file(&target);
            return Err(ExportError::Io {
                path: target,
                source,
            });
        }

        tracing::debug!(
            path = %target.display(),
            messages = transcript.len(),
            "exported transcript"
        );
        Ok(target)
    }

    /// Claim a free export path by creating it exclusively.
    fn reserve_path(&self, unix_secs: u64) -> Result<PathBuf, ExportError> {
        let mut attempt: u32 = 0;
        loop {
            let name = if attempt == 0 {
                format!("{unix_secs}{EXPORT_SUFFIX}")
            } else {
                format!("{unix_secs}-{attempt}{EXPORT_SUFFIX}")
            };
            let path = self.log_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(source) => return Err(ExportError::Io { path, source }),
            }
        }
    }
}

fn temp_sibling(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}
