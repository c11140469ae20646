use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    error::CollaboratorError,
    log_info,
    models::{ExportReceipt, ExportRequest},
    settings::SettingsStore,
};

use super::{csv, naming::resolve_export_path};

const ENABLE_LOGS: bool = true;

/// Durable destination for exported marks.
pub trait ExportSink: Send + Sync {
    fn write_export(
        &self,
        request: &ExportRequest,
        destination: Option<&Path>,
    ) -> Result<ExportReceipt, CollaboratorError>;
}

/// Writes exports as CSV files, by default into the configured export directory.
pub struct CsvFileSink {
    settings: Arc<SettingsStore>,
    fallback_dir: PathBuf,
}

impl CsvFileSink {
    pub fn new(settings: Arc<SettingsStore>, fallback_dir: PathBuf) -> Self {
        Self {
            settings,
            fallback_dir,
        }
    }

    fn default_dir(&self) -> PathBuf {
        self.settings
            .get()
            .export_dir
            .unwrap_or_else(|| self.fallback_dir.clone())
    }
}

impl ExportSink for CsvFileSink {
    fn write_export(
        &self,
        request: &ExportRequest,
        destination: Option<&Path>,
    ) -> Result<ExportReceipt, CollaboratorError> {
        let path = resolve_export_path(destination, &self.default_dir(), request);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                CollaboratorError::export(format!(
                    "failed to create export directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        fs::write(&path, csv::render(&request.rows)).map_err(|err| {
            CollaboratorError::export(format!("failed to write {}: {err}", path.display()))
        })?;

        log_info!("Wrote {} marks to {}", request.rows.len(), path.display());

        Ok(ExportReceipt {
            count: request.rows.len(),
            saved_to: path,
        })
    }
}
