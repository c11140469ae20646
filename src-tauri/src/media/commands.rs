use std::path::PathBuf;

use serde::Serialize;
use tauri::{AppHandle, Emitter, State};

use crate::{
    annotation::SessionInfo,
    captions::{load_caption_track, CaptionIndex},
    error::CollaboratorError,
    log_info, log_warn, AppState,
};

use super::{resolve_playable_source, PlayableSource, VIDEO_EXTENSIONS};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OpenVideoResponse {
    pub file_path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoadedVideo {
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub caption_count: usize,
    pub caption_error: Option<String>,
    pub session: SessionInfo,
}

/// Native picker for a single video file. Cancelling is not an error.
#[tauri::command]
pub async fn open_video_file() -> Result<OpenVideoResponse, String> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Open Video")
        .add_filter("Video", &VIDEO_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file()
        .await;

    let file_path = picked.map(|handle| handle.path().to_path_buf());
    match &file_path {
        Some(path) => log_info!("Selected video {}", path.display()),
        None => log_info!("Video selection cancelled"),
    }
    Ok(OpenVideoResponse { file_path })
}

#[tauri::command]
pub fn resolve_source(file_path: PathBuf) -> Result<PlayableSource, String> {
    resolve_playable_source(&file_path).map_err(|e| e.to_string())
}

/// Resolves the video, loads its captions and starts a fresh annotation session.
/// If the video cannot be resolved the current session is left untouched.
#[tauri::command]
pub async fn load_video(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    file_path: PathBuf,
) -> Result<LoadedVideo, String> {
    let source = resolve_playable_source(&file_path).map_err(|e| e.to_string())?;

    let settings = state.settings.get();
    let caption_path = file_path.clone();
    let extension = settings.caption_extension.clone();
    let captions = tokio::task::spawn_blocking(move || load_caption_track(&caption_path, &extension))
        .await
        .map_err(|err| CollaboratorError::captions(format!("caption loader failed: {err}")))
        .and_then(|result| result);

    let (index, caption_error) = match captions {
        Ok(index) => (index, None),
        Err(err) => {
            log_warn!("Ignoring caption track: {err}");
            (CaptionIndex::empty(), Some(err.to_string()))
        }
    };
    let caption_count = index.len();

    let session = state
        .annotation
        .begin_session(Some(file_path), settings.debounce_secs)
        .await;
    state.captions.replace(index);

    let _ = app_handle.emit("session-started", &session);

    Ok(LoadedVideo {
        url: source.url,
        file_name: source.file_name,
        mime_type: source.mime_type,
        caption_count,
        caption_error,
        session,
    })
}
