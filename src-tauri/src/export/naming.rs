use std::path::{Path, PathBuf};

use crate::models::{ExportRequest, ObserverRole};

pub const DEFAULT_FILE_NAME: &str = "marks.csv";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Lowercase alphanumerics; everything else becomes `_`, trimmed at the ends.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let sanitized: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn role_suffix(request: &ExportRequest) -> String {
    match (request.role, request.pgy_year) {
        (ObserverRole::Resident, Some(year)) => format!("resident_pgy{year}"),
        (ObserverRole::Resident, None) => "resident".to_string(),
        (ObserverRole::Attending, _) => "attending".to_string(),
    }
}

/// Final file path for an export.
///
/// The default `marks.csv` becomes `{ts}_mark_{role}[_{name}].csv`; any other
/// file name becomes `{ts}_{stem}_{role}[_{name}].{ext}`.
pub fn resolve_export_path(
    destination: Option<&Path>,
    default_dir: &Path,
    request: &ExportRequest,
) -> PathBuf {
    let target = match destination {
        Some(path) if path.is_dir() => path.join(DEFAULT_FILE_NAME),
        Some(path) => path.to_path_buf(),
        None => default_dir.join(DEFAULT_FILE_NAME),
    };
    let parent = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_dir.to_path_buf());

    let timestamp = request.session_started_at.format(TIMESTAMP_FORMAT).to_string();
    let suffix = role_suffix(request);
    let name = request.observer_name.as_deref().and_then(sanitize_name);

    let is_default = target
        .file_name()
        .map(|f| f == DEFAULT_FILE_NAME)
        .unwrap_or(true);

    let stem = if is_default {
        "mark".to_string()
    } else {
        target
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mark".to_string())
    };
    let extension = target
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());

    let mut parts = vec![timestamp, stem, suffix];
    if let Some(name) = name {
        parts.push(name);
    }

    parent.join(format!("{}.{}", parts.join("_"), extension))
}
