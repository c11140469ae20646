pub mod commands;
pub mod protocol;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CollaboratorError;

pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];
pub const MEDIA_SCHEME: &str = "media";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayableSource {
    pub url: String,
    pub mime_type: String,
    pub file_name: String,
}

/// MIME type for a video file, by extension.
pub fn video_mime_type(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" => "video/mp4".to_string(),
        "mov" => "video/quicktime".to_string(),
        "avi" => "video/x-msvideo".to_string(),
        "mkv" => "video/x-matroska".to_string(),
        "webm" => "video/webm".to_string(),
        _ => mime_guess::from_path(path)
            .first()
            .filter(|mime| mime.type_() == mime_guess::mime::VIDEO)
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "video/mp4".to_string()),
    }
}

/// URL under the `media` scheme that the webview can load for `path`.
pub fn media_url(path: &Path) -> String {
    let p_str = path.to_string_lossy().replace('\\', "/");
    let encoded = urlencoding::encode(&p_str);
    if cfg!(windows) {
        format!("http://{MEDIA_SCHEME}.localhost/{encoded}")
    } else {
        format!("{MEDIA_SCHEME}://localhost/{encoded}")
    }
}

/// Inverse of [`media_url`]'s path component.
pub fn path_from_media_uri_path(uri_path: &str) -> Option<PathBuf> {
    let encoded = uri_path.trim_start_matches('/');
    if encoded.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(encoded).ok()?;
    Some(PathBuf::from(decoded.into_owned()))
}

pub fn resolve_playable_source(path: &Path) -> Result<PlayableSource, CollaboratorError> {
    let metadata = std::fs::metadata(path)
        .map_err(|err| CollaboratorError::media(format!("{}: {err}", path.display())))?;
    if !metadata.is_file() {
        return Err(CollaboratorError::media(format!(
            "{} is not a file",
            path.display()
        )));
    }

    Ok(PlayableSource {
        url: media_url(path),
        mime_type: video_mime_type(path),
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    })
}
